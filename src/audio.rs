use std::{
    fs,
    path::Path,
};

use tracing::{
    info,
    warn,
};

use crate::{
    ImplError,
    Result,
    ffmpeg,
};

const WAV_HEADER_LEN: usize = 44;
const BYTES_PER_SAMPLE: u16 = 2;

/// Extracts the best audio stream of `source` into a 16-bit PCM wav file at `destination`.
///
/// Keeps the source sample rate and channel count. Returns `Ok(false)` without writing anything
/// when the source has no audio.
pub fn export_wav(
    source: &Path,
    destination: &Path,
) -> Result<bool>
{
    ffmpeg::init().map_err(|e| ImplError::FFmpeg("init", e))?;

    let mut input =
        ffmpeg::format::input(source).map_err(|e| ImplError::OpenSource(source.to_owned(), e))?;

    let Some(audio_stream) = input.streams().best(ffmpeg::media::Type::Audio)
    else
    {
        warn!("No audio stream in {}, skipping audio export", source.display());
        return Ok(false);
    };
    let audio_stream_index = audio_stream.index();

    let mut decoder = ffmpeg::codec::context::Context::from_parameters(audio_stream.parameters())
        .map_err(|e| ImplError::FFmpeg("audio decoder parameters", e))?
        .decoder()
        .audio()
        .map_err(|e| ImplError::FFmpeg("open audio decoder", e))?;

    let channel_layout = if decoder.channel_layout().is_empty()
    {
        ffmpeg::ChannelLayout::default(decoder.channels() as i32)
    }
    else
    {
        decoder.channel_layout()
    };
    decoder.set_channel_layout(channel_layout);

    let channels = channel_layout.channels() as u16;
    let sample_rate = decoder.rate();

    let mut resampler = decoder
        .resampler(
            ffmpeg::format::Sample::I16(ffmpeg::format::sample::Type::Packed),
            channel_layout,
            sample_rate,
        )
        .map_err(|e| ImplError::FFmpeg("create resampler", e))?;

    let mut pcm = Vec::new();
    for (stream, packet) in input.packets()
    {
        if stream.index() == audio_stream_index
        {
            decoder.send_packet(&packet).map_err(|e| ImplError::FFmpeg("decode audio", e))?;
            drain_decoder(&mut decoder, &mut resampler, channel_layout, channels, &mut pcm)?;
        }
    }
    decoder.send_eof().map_err(|e| ImplError::FFmpeg("flush audio decoder", e))?;
    drain_decoder(&mut decoder, &mut resampler, channel_layout, channels, &mut pcm)?;

    // The resampler may still hold a few samples of delay
    loop
    {
        let mut resampled = ffmpeg::util::frame::audio::Audio::empty();
        let delay =
            resampler.flush(&mut resampled).map_err(|e| ImplError::FFmpeg("flush resampler", e))?;
        append_samples(&resampled, channels, &mut pcm);
        if delay.is_none() || resampled.samples() == 0
        {
            break;
        }
    }

    fs::write(destination, encode_wav(channels, sample_rate, &pcm)?)
        .map_err(|e| ImplError::FileWrite(destination.to_owned(), e))?;
    info!(
        "Saved {} channel(s) of {} Hz audio to {}",
        channels,
        sample_rate,
        destination.display()
    );
    Ok(true)
}

fn drain_decoder(
    decoder: &mut ffmpeg::decoder::Audio,
    resampler: &mut ffmpeg::software::resampling::Context,
    channel_layout: ffmpeg::ChannelLayout,
    channels: u16,
    pcm: &mut Vec<u8>,
) -> Result<()>
{
    let mut decoded = ffmpeg::util::frame::audio::Audio::empty();
    loop
    {
        match decoder.receive_frame(&mut decoded)
        {
            Ok(()) => (),
            Err(ffmpeg::Error::Eof) => return Ok(()),
            Err(ffmpeg::Error::Other {
                errno,
            }) if errno == ffmpeg::error::EAGAIN => return Ok(()),
            Err(e) => return Err(ImplError::FFmpeg("decode audio frame", e).into()),
        }
        if decoded.channel_layout().is_empty()
        {
            decoded.set_channel_layout(channel_layout);
        }

        let mut resampled = ffmpeg::util::frame::audio::Audio::empty();
        resampler
            .run(&decoded, &mut resampled)
            .map_err(|e| ImplError::FFmpeg("resample audio", e))?;
        append_samples(&resampled, channels, pcm);
    }
}

fn append_samples(
    resampled: &ffmpeg::util::frame::audio::Audio,
    channels: u16,
    pcm: &mut Vec<u8>,
)
{
    if resampled.samples() == 0
    {
        return;
    }
    // Packed samples live interleaved in the first plane, which may be padded past the end
    let len = resampled.samples() * channels as usize * BYTES_PER_SAMPLE as usize;
    pcm.extend_from_slice(&resampled.data(0)[..len]);
}

/// Size of the `data` chunk, if the whole RIFF file still fits in 32-bit lengths.
fn wav_data_len(pcm_len: usize) -> Result<u32>
{
    u32::try_from(pcm_len)
        .ok()
        .filter(|len| len.checked_add(WAV_HEADER_LEN as u32 - 8).is_some())
        .ok_or_else(|| ImplError::WavTooLarge(pcm_len).into())
}

/// Canonical RIFF/WAVE file around interleaved little-endian 16-bit PCM.
pub fn encode_wav(
    channels: u16,
    sample_rate: u32,
    pcm: &[u8],
) -> Result<Vec<u8>>
{
    let data_len = wav_data_len(pcm.len())?;
    let block_align = channels * BYTES_PER_SAMPLE;
    let byte_rate = sample_rate * block_align as u32;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&(BYTES_PER_SAMPLE * 8).to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    Ok(wav)
}
