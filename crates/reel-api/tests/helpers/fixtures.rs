//! Test fixtures: deterministic video-like blobs.

/// Bytes that start like an MP4 (`ftyp` box) followed by a non-repeating
/// pattern, so any misplaced slice is detected.
pub fn sample_mp4(len: usize) -> Vec<u8> {
    let header: [u8; 12] = [
        0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm',
    ];
    let mut data: Vec<u8> = header.iter().copied().take(len).collect();
    let mut state: u32 = 0x9E37_79B9;
    while data.len() < len {
        // xorshift32
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        data.push((state >> 24) as u8);
    }
    data
}
