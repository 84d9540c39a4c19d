use crate::types::DecodedAudio;
use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decode a recording to mono f32 samples
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<DecodedAudio> {
    let path = path.as_ref();

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open recording: {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Unsupported audio format: {}", path.display()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found in recording")?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Sample rate not specified in recording")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create decoder")?;

    let mut samples = Vec::new();
    let mut packets = 0usize;
    let mut skipped = 0usize;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err).context("Failed to read packet"),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!(reason, "skipping undecodable packet");
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err).context("Failed to decode audio packet"),
        };
        packets += 1;

        let channels = decoded.spec().channels.count().max(1);
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buffer.copy_interleaved_ref(decoded);
        downmix_into(buffer.samples(), channels, &mut samples);
    }

    debug!(
        path = %path.display(),
        packets,
        skipped,
        sample_rate,
        samples = samples.len(),
        "recording decoded"
    );
    Ok(DecodedAudio::new(samples, sample_rate))
}

/// Average interleaved frames down to one channel.
fn downmix_into(interleaved: &[f32], channels: usize, mono: &mut Vec<f32>) {
    if channels == 1 {
        mono.extend_from_slice(interleaved);
        return;
    }
    mono.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

#[cfg(test)]
mod tests {
    use super::downmix_into;

    #[test]
    fn averages_stereo_frames() {
        let mut mono = Vec::new();
        downmix_into(&[0.5, -0.5, 1.0, 0.0], 2, &mut mono);
        assert_eq!(mono, vec![0.0, 0.5]);
    }

    #[test]
    fn mono_passes_through() {
        let mut mono = vec![0.1];
        downmix_into(&[0.2, 0.3], 1, &mut mono);
        assert_eq!(mono, vec![0.1, 0.2, 0.3]);
    }
}
