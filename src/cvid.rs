//! The CVID container: a 7 byte big-endian header followed by the payload of one encoding.
//!
//! ```text
//! offset 0: width        u16
//! offset 2: height       u16
//! offset 4: frame count  u16
//! offset 6: frame rate   u8
//! offset 7: payload
//! ```
//!
//! There is no magic number, version or checksum.

use std::io::{
    self,
    Seek,
    SeekFrom,
    Write,
};

use tracing::warn;

use crate::{
    Encoding,
    FrameEncoder,
    FrameSize,
    MonoFrame,
};

pub const HEADER_LEN: usize = 7;
const FRAME_COUNT_OFFSET: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerHeader
{
    pub width: u16,
    pub height: u16,
    pub frame_count: u16,
    pub frame_rate: u8,
}

impl ContainerHeader
{
    /// Frame counts above 65535 keep their low 16 bits and frame rates keep the low 8 bits of
    /// their integer part.
    pub fn new(
        size: FrameSize,
        frame_count: u64,
        frame_rate: f64,
    ) -> ContainerHeader
    {
        ContainerHeader {
            width: size.width,
            height: size.height,
            frame_count: frame_count as u16,
            frame_rate: frame_rate.trunc() as u64 as u8,
        }
    }

    pub fn frame_size(&self) -> FrameSize
    {
        FrameSize::new(self.width, self.height)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN]
    {
        let mut bytes = [0; HEADER_LEN];
        bytes[0..2].copy_from_slice(&self.width.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.height.to_be_bytes());
        bytes[4..6].copy_from_slice(&self.frame_count.to_be_bytes());
        bytes[6] = self.frame_rate;
        bytes
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> ContainerHeader
    {
        ContainerHeader {
            width: u16::from_be_bytes([bytes[0], bytes[1]]),
            height: u16::from_be_bytes([bytes[2], bytes[3]]),
            frame_count: u16::from_be_bytes([bytes[4], bytes[5]]),
            frame_rate: bytes[6],
        }
    }
}

/// Streams frames into a CVID file.
///
/// The header goes out as soon as the writer is created. If the number of frames actually written
/// disagrees with the header when the writer is finished, the frame count field is rewritten in
/// place.
pub struct CvidWriter<W>
where
    W: Write + Seek,
{
    inner: W,
    header: ContainerHeader,
    encoder: FrameEncoder,
    cutoff: u8,
    buffer: Vec<u8>,
    frames_written: u64,
    payload_len: u64,
}

impl<W> CvidWriter<W>
where
    W: Write + Seek,
{
    pub fn new(
        mut inner: W,
        header: ContainerHeader,
        encoding: Encoding,
        cutoff: u8,
    ) -> io::Result<CvidWriter<W>>
    {
        let start = inner.stream_position()?;
        if start != 0
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "CVID output must start at offset 0",
            ));
        }
        inner.write_all(&header.to_bytes())?;

        Ok(CvidWriter {
            inner,
            header,
            encoder: FrameEncoder::new(encoding),
            cutoff,
            buffer: Vec::with_capacity(header.frame_size().pixel_count()),
            frames_written: 0,
            payload_len: 0,
        })
    }

    pub fn header(&self) -> &ContainerHeader
    {
        &self.header
    }

    pub fn frames_written(&self) -> u64
    {
        self.frames_written
    }

    pub fn payload_len(&self) -> u64
    {
        self.payload_len
    }

    pub fn write_frame(
        &mut self,
        frame: &MonoFrame,
    ) -> io::Result<()>
    {
        debug_assert_eq!(frame.size(), self.header.frame_size());

        self.buffer.clear();
        self.encoder.encode_frame(frame, self.cutoff, &mut self.buffer);
        self.inner.write_all(&self.buffer)?;
        self.payload_len += self.buffer.len() as u64;
        self.frames_written += 1;
        Ok(())
    }

    /// Flushes trailing encoder state, fixes up the frame count and hands back the writer.
    pub fn finish(mut self) -> io::Result<W>
    {
        self.buffer.clear();
        self.encoder.finish(&mut self.buffer);
        self.inner.write_all(&self.buffer)?;
        self.payload_len += self.buffer.len() as u64;

        let frame_count = self.frames_written as u16;
        if frame_count != self.header.frame_count
        {
            warn!(
                "Source reported {} frames but {} were encoded, rewriting header",
                self.header.frame_count, self.frames_written
            );
            self.header.frame_count = frame_count;
            self.inner.seek(SeekFrom::Start(FRAME_COUNT_OFFSET))?;
            self.inner.write_all(&frame_count.to_be_bytes())?;
            self.inner.seek(SeekFrom::End(0))?;
        }

        self.inner.flush()?;
        Ok(self.inner)
    }
}
