//! Common test utilities and helpers.
//!
//! Synthetic header builders shared by the integration tests. Every builder
//! produces a structurally valid instance of its format unless told
//! otherwise; tests then corrupt specific fields.

/// A minimal valid RIFF/WAVE (PCM) container with `data_len` sample bytes.
pub fn build_wave(data_len: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    let riff_len = 4 + 8 + 16 + 8 + data_len;
    out.extend_from_slice(&(riff_len as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&[0u8; 14]);
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());
    out.extend(std::iter::repeat_n(0u8, data_len));
    out
}

/// A little-endian DDS header. Callers append payload or corrupt fields.
pub fn build_dds_header(width: u32, height: u32, mips: u32, four_cc: &[u8; 4]) -> Vec<u8> {
    let mut h = vec![0u8; 128];
    h[0..4].copy_from_slice(b"DDS ");
    h[4..8].copy_from_slice(&124u32.to_le_bytes());
    h[12..16].copy_from_slice(&height.to_le_bytes());
    h[16..20].copy_from_slice(&width.to_le_bytes());
    h[28..32].copy_from_slice(&mips.to_le_bytes());
    h[76..80].copy_from_slice(&32u32.to_le_bytes());
    h[84..88].copy_from_slice(four_cc);
    h
}

/// A plausible script source with a header line and a couple of statements.
pub fn build_script(name: &str) -> Vec<u8> {
    format!("scn {name}\nshort doOnce\nbegin GameMode\n\tset doOnce to 1\nend\n").into_bytes()
}
