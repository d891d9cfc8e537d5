//! Phrase audio composition
//!
//! Builds a pronunciation clip for multi-word entries by concatenating the
//! per-token dictionary clips with a short silence between them.
//!
//! Token clips are decoded with symphonia (MP3 and WAV), keeping the first
//! channel. Output is always 16-bit mono PCM WAV.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

pub const TARGET_SAMPLE_RATE: u32 = 44_100;
pub const TOKEN_GAP_SECS: f32 = 0.12;
pub const MAX_PHRASE_TOKENS: usize = 6;
pub const MIN_PHRASE_TOKENS: usize = 2;

const WAV_HEADER_LEN: usize = 44;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("unrecognized audio container: {0}")]
    Unrecognized(String),
    #[error("no decodable audio track")]
    NoTrack,
    #[error("audio decode failed: {0}")]
    Decode(String),
    #[error("audio stream holds no samples")]
    Empty,
}

/// Mono samples in `[-1, 1]`
#[derive(Clone, Debug, PartialEq)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl AudioClip {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Linear-interpolation resample
    pub fn resample(&self, rate: u32) -> AudioClip {
        if rate == self.sample_rate || self.samples.is_empty() || self.sample_rate == 0 {
            return AudioClip {
                sample_rate: rate,
                samples: self.samples.clone(),
            };
        }
        let ratio = self.sample_rate as f64 / rate as f64;
        let out_len = ((self.samples.len() as f64) / ratio).round().max(1.0) as usize;
        let last = self.samples.len() - 1;
        let samples = (0..out_len)
            .map(|i| {
                let pos = i as f64 * ratio;
                let idx = (pos.floor() as usize).min(last);
                let next = (idx + 1).min(last);
                let frac = (pos - idx as f64) as f32;
                self.samples[idx] + (self.samples[next] - self.samples[idx]) * frac
            })
            .collect();
        AudioClip {
            sample_rate: rate,
            samples,
        }
    }
}

/// Decodes an MP3 or WAV clip, keeping the first channel
pub fn decode_clip(data: &[u8]) -> Result<AudioClip, AudioError> {
    let source = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::Unrecognized(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(AudioError::NoTrack)?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode(e.to_string()))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // corrupt frame, keep going
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };
        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        sample_rate = spec.rate;
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend(buffer.samples().iter().step_by(channels).copied());
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(AudioError::Empty);
    }
    Ok(AudioClip {
        sample_rate,
        samples,
    })
}

/// Encodes mono samples as 16-bit PCM WAV; output is `44 + 2 * n` bytes
pub fn encode_wav(clip: &AudioClip) -> Vec<u8> {
    let data_len = (clip.samples.len() * 2) as u32;
    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&clip.sample_rate.to_le_bytes());
    out.extend_from_slice(&(clip.sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in &clip.samples {
        let v = s.clamp(-1.0, 1.0);
        let int = if v < 0.0 { v * 32768.0 } else { v * 32767.0 };
        out.extend_from_slice(&(int as i16).to_le_bytes());
    }
    out
}

/// Concatenates clips at `rate` with `gap_secs` of silence between them.
/// Returns `None` when there is nothing to join.
pub fn compose_phrase(clips: &[AudioClip], rate: u32, gap_secs: f32) -> Option<AudioClip> {
    if clips.is_empty() {
        return None;
    }
    let gap = (rate as f32 * gap_secs).round() as usize;
    let mut samples = Vec::new();
    for (i, clip) in clips.iter().enumerate() {
        if i > 0 {
            samples.extend(std::iter::repeat(0.0).take(gap));
        }
        samples.extend(clip.resample(rate).samples);
    }
    Some(AudioClip {
        sample_rate: rate,
        samples,
    })
}

/// Decodes each token clip (skipping undecodable ones) and builds the phrase
/// WAV with the default rate and gap.
pub fn compose_phrase_wav(token_audio: &[Vec<u8>]) -> Option<Vec<u8>> {
    let clips: Vec<AudioClip> = token_audio
        .iter()
        .filter_map(|bytes| decode_clip(bytes).ok())
        .collect();
    compose_phrase(&clips, TARGET_SAMPLE_RATE, TOKEN_GAP_SECS).map(|clip| encode_wav(&clip))
}
