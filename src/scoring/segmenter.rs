use crate::scoring::tones::Tone;
use crate::types::{PitchTrack, Syllable, SyllableWindow};

/// Evenly spaced window edges over `[0, duration]`.
///
/// Always returns `max(1, syllable_count) + 1` edges. The last edge is exactly
/// `duration`; a degenerate duration yields all-zero edges.
pub fn window_edges(duration: f64, syllable_count: usize) -> Vec<f64> {
    let count = syllable_count.max(1);
    let duration = if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    };
    let mut edges: Vec<f64> = (0..=count)
        .map(|i| i as f64 * duration / count as f64)
        .collect();
    edges[count] = duration;
    edges
}

/// Splits the track span into one window per syllable, in phrase order.
///
/// Segmentation is proportional, not acoustic: every syllable is assumed to
/// take the same share of the recording. No syllables still produces one
/// neutral window over the whole track.
pub fn segment(duration: f64, syllables: &[Syllable]) -> Vec<SyllableWindow> {
    let edges = window_edges(duration, syllables.len());
    let last = edges.len() - 2;
    (0..=last)
        .map(|index| {
            let (syllable, tone) = syllables
                .get(index)
                .map(|s| (s.text.clone(), s.tone))
                .unwrap_or_else(|| (String::new(), Tone::Neutral));
            SyllableWindow {
                index,
                syllable,
                tone,
                start: edges[index],
                end: edges[index + 1],
                // A zero-width window owns no samples, not even one on its edge.
                closes_track: index == last && edges[index + 1] > edges[index],
            }
        })
        .collect()
}

/// Frequencies of the track samples falling inside `window`, in track order.
/// Unvoiced frames are kept as `None`.
pub fn window_frequencies(track: &PitchTrack, window: &SyllableWindow) -> Vec<Option<f64>> {
    track
        .samples()
        .iter()
        .filter(|sample| window.contains(sample.time))
        .map(|sample| sample.frequency)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PitchSample;
    use approx::assert_relative_eq;

    fn syllables(texts: &[&str]) -> Vec<Syllable> {
        texts.iter().map(|text| Syllable::classify(*text)).collect()
    }

    #[test]
    fn edges_are_uniform() {
        let edges = window_edges(1.5, 3);
        assert_eq!(edges.len(), 4);
        assert_relative_eq!(edges[1], 0.5);
        assert_relative_eq!(edges[2], 1.0);
        assert_eq!(edges[3], 1.5);
    }

    #[test]
    fn windows_partition_track() {
        for &duration in &[0.1, 0.7, 1.0, 2.37, 13.0] {
            for count in 1..=9 {
                let texts = vec!["ma"; count];
                let windows = segment(duration, &syllables(&texts));
                assert_eq!(windows.len(), count);
                assert_eq!(windows[0].start, 0.0);
                assert_eq!(windows[count - 1].end, duration);
                for pair in windows.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                    assert!(pair[0].start < pair[0].end);
                }
                assert!(windows[count - 1].closes_track);
                assert!(windows[..count - 1].iter().all(|w| !w.closes_track));
            }
        }
    }

    #[test]
    fn empty_syllable_list_gets_one_neutral_window() {
        let windows = segment(2.0, &[]);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].tone, Tone::Neutral);
        assert_eq!((windows[0].start, windows[0].end), (0.0, 2.0));
    }

    #[test]
    fn degenerate_duration_gives_zero_width_windows() {
        let windows = segment(0.0, &syllables(&["nǐ", "hǎo"]));
        assert_eq!(windows.len(), 2);
        assert!(windows.iter().all(|w| w.duration() == 0.0));
        assert!(windows.iter().all(|w| !w.closes_track && !w.contains(0.0)));
        let windows = segment(f64::NAN, &syllables(&["nǐ"]));
        assert_eq!((windows[0].start, windows[0].end), (0.0, 0.0));
    }

    #[test]
    fn samples_on_inner_edges_go_to_later_window() {
        let track = PitchTrack::new(
            vec![
                PitchSample::voiced(0.0, 100.0),
                PitchSample::voiced(0.5, 200.0),
                PitchSample::unvoiced(0.75),
                PitchSample::voiced(1.0, 300.0),
            ],
            1.0,
        );
        let windows = segment(track.duration(), &syllables(&["xiè", "xie"]));
        assert_eq!(window_frequencies(&track, &windows[0]), vec![Some(100.0)]);
        assert_eq!(
            window_frequencies(&track, &windows[1]),
            vec![Some(200.0), None, Some(300.0)]
        );
    }

    #[test]
    fn samples_outside_track_are_ignored() {
        let track = PitchTrack::new(
            vec![
                PitchSample::voiced(-0.1, 100.0),
                PitchSample::voiced(1.2, 300.0),
            ],
            1.0,
        );
        let windows = segment(track.duration(), &syllables(&["zhōng"]));
        assert!(window_frequencies(&track, &windows[0]).is_empty());
    }
}
