//! MPEG audio frame header parsing.
//!
//! Covers MPEG-1, MPEG-2 and MPEG-2.5, layers I to III. Only the fixed
//! 4-byte header is examined; side info and payload belong to the frame
//! decoder.

/// Largest frame the header can describe (MPEG-2.5 Layer II, 160 kbps, 8 kHz, padded).
pub const MAX_FRAME_BYTES: usize = 2881;

/// Size of the fixed frame header.
pub const HEADER_LEN: usize = 4;

// ── Lookup tables ────────────────────────────────────────────────────

/// Bitrates in kbps, indexed by `[row][bitrate_index]`.
/// Rows: V1 L1, V1 L2, V1 L3, V2/2.5 L1, V2/2.5 L2+L3.
const BITRATES: [[u16; 15]; 5] = [
    [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448],
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384],
    [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320],
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256],
    [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
];

/// MPEG-1 sample rates; MPEG-2 halves them, MPEG-2.5 quarters them.
const SAMPLE_RATES: [u32; 3] = [44100, 48000, 32000];

// ── Header ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

/// A parsed MPEG audio frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: MpegVersion,
    /// 1, 2 or 3.
    pub layer: u8,
    /// 0 for free-format streams.
    pub bitrate_kbps: u32,
    pub sample_rate: u32,
    pub padding: bool,
    pub channel_mode: ChannelMode,
}

impl FrameHeader {
    /// Parse the 4 header bytes at the start of `bytes`.
    ///
    /// Returns `None` for a missing sync word or any reserved field value.
    pub fn parse(bytes: &[u8]) -> Option<FrameHeader> {
        if bytes.len() < HEADER_LEN {
            return None;
        }
        let (b1, b2, b3) = (bytes[1], bytes[2], bytes[3]);
        if bytes[0] != 0xFF || b1 & 0xE0 != 0xE0 {
            return None;
        }

        let version = match (b1 >> 3) & 3 {
            0 => MpegVersion::Mpeg25,
            2 => MpegVersion::Mpeg2,
            3 => MpegVersion::Mpeg1,
            _ => return None,
        };
        let layer = match (b1 >> 1) & 3 {
            1 => 3,
            2 => 2,
            3 => 1,
            _ => return None,
        };

        let bitrate_index = (b2 >> 4) as usize;
        let rate_index = ((b2 >> 2) & 3) as usize;
        if bitrate_index == 15 || rate_index == 3 {
            return None;
        }

        let row = match (version, layer) {
            (MpegVersion::Mpeg1, l) => (l - 1) as usize,
            (_, 1) => 3,
            _ => 4,
        };
        let sample_rate = match version {
            MpegVersion::Mpeg1 => SAMPLE_RATES[rate_index],
            MpegVersion::Mpeg2 => SAMPLE_RATES[rate_index] / 2,
            MpegVersion::Mpeg25 => SAMPLE_RATES[rate_index] / 4,
        };
        let channel_mode = match b3 >> 6 {
            0 => ChannelMode::Stereo,
            1 => ChannelMode::JointStereo,
            2 => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        };

        Some(FrameHeader {
            version,
            layer,
            bitrate_kbps: BITRATES[row][bitrate_index] as u32,
            sample_rate,
            padding: (b2 >> 1) & 1 == 1,
            channel_mode,
        })
    }

    pub fn channels(&self) -> u16 {
        if self.channel_mode == ChannelMode::Mono { 1 } else { 2 }
    }

    /// Samples per channel carried by one frame.
    pub fn samples_per_frame(&self) -> usize {
        match (self.layer, self.version) {
            (1, _) => 384,
            (2, _) | (3, MpegVersion::Mpeg1) => 1152,
            _ => 576,
        }
    }

    /// Total frame length in bytes including the header, or `None` for
    /// free-format frames whose length is not encoded in the header.
    pub fn frame_len(&self) -> Option<usize> {
        if self.bitrate_kbps == 0 {
            return None;
        }
        let bitrate = self.bitrate_kbps as usize * 1000;
        let rate = self.sample_rate as usize;
        let pad = self.padding as usize;
        let len = if self.layer == 1 {
            (12 * bitrate / rate + pad) * 4
        } else {
            self.samples_per_frame() / 8 * bitrate / rate + pad
        };
        Some(len)
    }
}

/// Scan `data` for the first position holding a parseable header with a
/// known frame length. Returns the offset and the header.
pub fn find_frame(data: &[u8]) -> Option<(usize, FrameHeader)> {
    let last = data.len().checked_sub(HEADER_LEN)?;
    (0..=last).find_map(|pos| {
        FrameHeader::parse(&data[pos..])
            .filter(|h| h.frame_len().is_some())
            .map(|h| (pos, h))
    })
}
