//! Output sizing from a probed descriptor.

use crate::descriptor::MediaDescriptor;

/// Source pixel area above which video is scaled down (640x480).
pub const DOWNSCALE_AREA: u64 = 640 * 480;

/// Round a dimension down to an even value.
pub(crate) fn even(value: u32) -> u32 {
    value / 2 * 2
}

/// `floor(value / 2) * 2`, saturating at zero for non-positive input.
pub fn floor_even(value: f64) -> u32 {
    if !(value > 0.0) {
        return 0;
    }
    ((value / 2.0).floor() as u32).saturating_mul(2)
}

/// Pick the output resolution for a `target_width` x `target_height` frame.
///
/// Sources larger than [`DOWNSCALE_AREA`] pin one target dimension and derive
/// the other from the aspect ratio, rounded down to even: the width for tall
/// sources (aspect below 1), the height otherwise. Smaller sources keep their
/// own dimensions. Returns `None` when the descriptor has no video stream.
pub fn fit_video(
    descriptor: &MediaDescriptor,
    target_width: u32,
    target_height: u32,
) -> Option<(u32, u32)> {
    let video = descriptor.video.as_ref()?;
    let area = u64::from(video.width) * u64::from(video.height);
    if area <= DOWNSCALE_AREA {
        return Some((video.width, video.height));
    }

    if video.aspect_ratio < 1.0 {
        Some((
            target_width,
            floor_even(f64::from(target_width) * video.aspect_ratio),
        ))
    } else {
        Some((
            floor_even(f64::from(target_height) / video.aspect_ratio),
            target_height,
        ))
    }
}

/// Pick the output sample rate among `rates`.
///
/// With a known source rate this is the highest candidate not above it, or
/// the smallest candidate when all exceed it. With no source rate it is the
/// highest candidate. Returns `None` only when `rates` is empty.
pub fn fit_audio(descriptor: &MediaDescriptor, rates: &[u32]) -> Option<u32> {
    let min = rates.iter().copied().min()?;
    match descriptor.audio_sample_rate() {
        Some(source) => rates
            .iter()
            .copied()
            .filter(|&rate| rate <= source || rate == min)
            .max(),
        None => rates.iter().copied().max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{AudioStream, VideoStream};

    fn with_video(width: u32, height: u32) -> MediaDescriptor {
        MediaDescriptor {
            video: Some(VideoStream {
                codec: "h264".into(),
                width,
                height,
                aspect_ratio: f64::from(width) / f64::from(height),
                fps: None,
            }),
            ..Default::default()
        }
    }

    fn with_sample_rate(rate: Option<u32>) -> MediaDescriptor {
        MediaDescriptor {
            audio: rate.map(|sample_rate| AudioStream {
                codec: "mp3".into(),
                sample_rate,
                sample_format: "stereo".into(),
                bitrate: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn even_rounding() {
        assert_eq!(even(641), 640);
        assert_eq!(even(480), 480);
        assert_eq!(even(1), 0);
        assert_eq!(floor_even(269.97), 268);
        assert_eq!(floor_even(270.0), 270);
        assert_eq!(floor_even(-3.0), 0);
        assert_eq!(floor_even(f64::NAN), 0);
    }

    #[test]
    fn wide_source_pins_height() {
        // 480 / (1280/720) = 270 exactly, already even.
        assert_eq!(with_video(1280, 720).fit_video(640, 480), Some((270, 480)));
    }

    #[test]
    fn tall_source_pins_width() {
        // 640 * (720/1280) = 360.
        assert_eq!(with_video(720, 1280).fit_video(640, 480), Some((640, 360)));
    }

    #[test]
    fn derived_dimension_is_floored_to_even() {
        // 480 / (1000/700) = 336, 480 / (1000/701) = 336.48 -> 336.
        assert_eq!(with_video(1000, 701).fit_video(640, 480), Some((336, 480)));
        // 480 / (1000/703) = 337.44 -> 336.
        assert_eq!(with_video(1000, 703).fit_video(640, 480), Some((336, 480)));
    }

    #[test]
    fn small_source_is_unchanged() {
        assert_eq!(with_video(320, 240).fit_video(640, 480), Some((320, 240)));
        assert_eq!(with_video(320, 240).fit_video(100, 100), Some((320, 240)));
        // Exactly 640x480 is not above the threshold.
        assert_eq!(with_video(640, 480).fit_video(320, 240), Some((640, 480)));
    }

    #[test]
    fn no_video_stream() {
        assert_eq!(MediaDescriptor::default().fit_video(640, 480), None);
    }

    #[test]
    fn audio_picks_highest_not_above_source() {
        let d = with_sample_rate(Some(22050));
        assert_eq!(d.fit_audio(&[44100, 22050, 11025]), Some(22050));
        let d = with_sample_rate(Some(48000));
        assert_eq!(d.fit_audio(&[44100, 22050, 11025]), Some(44100));
    }

    #[test]
    fn audio_falls_back_to_minimum() {
        let d = with_sample_rate(Some(8000));
        assert_eq!(d.fit_audio(&[44100, 22050, 11025]), Some(11025));
    }

    #[test]
    fn audio_unknown_source_picks_maximum() {
        let d = with_sample_rate(None);
        assert_eq!(d.fit_audio(&[44100, 22050, 11025]), Some(44100));
        assert_eq!(d.fit_audio(&[11025, 44100]), Some(44100));
    }

    #[test]
    fn audio_without_candidates() {
        assert_eq!(with_sample_rate(Some(44100)).fit_audio(&[]), None);
    }
}
