/// Marker stored in the low 32 bits of an encoded offset to signal that the
/// offset is an absolute index into full history rather than a tag-relative
/// count. A legitimate offset equal to this value would be misread as
/// anomalous; that collision is a known, accepted limitation.
pub const SENTINEL: u32 = 0xFACE_FEED;

/// An offset with its interpretation flag, unpacked from the wire encoding.
///
/// This is the working representation everywhere past `decode`; the packed
/// i64 only exists at the boundary between the version decoder and the
/// resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedOffset {
    pub offset: i64,
    pub anomaly: bool,
}

/// Packs an anomalous offset: the offset moves to the high 32 bits and the
/// sentinel occupies the low 32.
pub fn encode_anomalous(offset: u32) -> i64 {
    ((offset as i64) << 32) | (SENTINEL as i64)
}

/// Unpacks an encoded offset. If the low 32 bits match the sentinel, the
/// value is anomalous and the real offset sits in the high 32 bits;
/// otherwise the value is the offset itself.
pub fn decode(encoded: i64) -> DecodedOffset {
    if (encoded & 0xFFFF_FFFF) as u32 == SENTINEL {
        // Logical shift: the packed offset is an unsigned 32-bit count.
        DecodedOffset {
            offset: ((encoded as u64) >> 32) as i64,
            anomaly: true,
        }
    } else {
        DecodedOffset {
            offset: encoded,
            anomaly: false,
        }
    }
}
