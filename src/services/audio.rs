/// Audio player: plays a creature's cry after a correct guess. Best effort only.
use std::io::Cursor;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use tracing::{debug, warn};

use crate::error::AudioError;

pub const DEFAULT_CRY_BASE: &str = "https://play.pokemonshowdown.com/audio/cries/";

/// Extra time the stream is kept alive after the last frame is queued
const TAIL: Duration = Duration::from_millis(250);

/// Fallible, non-blocking playback. `play` only schedules work and reports what it can check up front.
pub trait AudioPlayer: Send + Sync {
    fn play(&self, url: &str) -> Result<(), AudioError>;
}

/// Used with `--mute`
#[derive(Debug, Default)]
pub struct MutedPlayer;

impl AudioPlayer for MutedPlayer {
    fn play(&self, url: &str) -> Result<(), AudioError> {
        debug!(%url, "muted; skipping cry");
        Ok(())
    }
}

/// Downloads an ogg/vorbis cry, decodes it and plays it on the default output device
pub struct CryPlayer {
    client: reqwest::Client,
}

impl CryPlayer {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl AudioPlayer for CryPlayer {
    fn play(&self, url: &str) -> Result<(), AudioError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| AudioError::NoRuntime)?;
        if cpal::default_host().default_output_device().is_none() {
            return Err(AudioError::NoOutputDevice);
        }

        let client = self.client.clone();
        let url = url.to_string();
        runtime.spawn(async move {
            if let Err(error) = fetch_and_play(client, &url).await {
                warn!(%url, %error, "cry unavailable");
            }
        });
        Ok(())
    }
}

async fn fetch_and_play(client: reqwest::Client, url: &str) -> Result<(), AudioError> {
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    debug!(%url, len = bytes.len(), "cry downloaded");
    tokio::task::spawn_blocking(move || play_blocking(bytes.to_vec())).await?
}

/// Owns the cpal stream for the length of the clip; cpal streams are not `Send` everywhere.
fn play_blocking(bytes: Vec<u8>) -> Result<(), AudioError> {
    let (frames, clip_rate) = decode_cry(bytes)?;
    let clip_len = Duration::from_secs_f64(frames.len() as f64 / clip_rate as f64);

    let device = cpal::default_host()
        .default_output_device()
        .ok_or(AudioError::NoOutputDevice)?;
    let sample_rate = device.default_output_config()?.sample_rate();
    let config = cpal::StreamConfig {
        channels: 2,
        sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };

    let (mut mixer_handle, mixer) = oddio::split(oddio::Mixer::new());
    let signal = oddio::FramesSignal::from(oddio::Frames::from_slice(clip_rate, &frames));
    let _ = mixer_handle.control::<oddio::Mixer<_>, _>().play(signal);

    let stream = device.build_output_stream(
        &config,
        move |out_flat: &mut [f32], _: &cpal::OutputCallbackInfo| {
            let out_stereo: &mut [[f32; 2]] = oddio::frame_stereo(out_flat);
            oddio::run(&mixer, sample_rate.0, out_stereo);
        },
        |error| warn!(%error, "audio stream error"),
        None,
    )?;
    stream.play()?;
    std::thread::sleep(clip_len + TAIL);
    Ok(())
}

/// Decode a whole clip into stereo frames plus its sample rate.
pub fn decode_cry(bytes: Vec<u8>) -> Result<(Vec<[f32; 2]>, u32), AudioError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
    let mut hint = Hint::new();
    hint.with_extension("ogg");
    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut reader = probed.format;
    let track = reader.default_track().ok_or(AudioError::NoTrack)?;
    let track_id = track.id;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;
    let sample_rate = decoder.codec_params().sample_rate.unwrap_or(44_100);

    let mut frames = Vec::new();
    // End of stream surfaces as a read error; whatever decoded so far is the clip.
    while let Ok(packet) = reader.next_packet() {
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(error) => {
                debug!(%error, "dropping undecodable packet");
                continue;
            }
        };
        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        let mut samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        samples.copy_interleaved_ref(decoded);
        frames.extend(samples.samples().chunks(channels).map(to_stereo));
    }

    Ok((frames, sample_rate))
}

fn to_stereo(frame: &[f32]) -> [f32; 2] {
    match frame {
        [left, right, ..] => [*left, *right],
        [mono] => [*mono, *mono],
        [] => [0.0, 0.0],
    }
}
