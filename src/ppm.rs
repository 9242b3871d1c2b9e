//! # PPM Writer
//!
//! Writes a raw `P6` PPM frame (header + packed RGB bytes) to any [`std::io::Write`] - the format
//! the encoder pipe expects on its stdin.

use std::io::{self, Write};

pub fn write_ppm_frame<W: Write>(
    writer: &mut W,
    width: usize,
    height: usize,
    rgb: &[u8],
) -> io::Result<()> {
    assert_eq!(rgb.len(), width * height * 3);
    write!(writer, "P6\n{width} {height}\n255\n")?;
    writer.write_all(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_the_expected_header_and_payload() {
        let rgb = vec![1, 2, 3, 4, 5, 6];
        let mut buf = Vec::new();
        write_ppm_frame(&mut buf, 2, 1, &rgb).unwrap();
        let header = b"P6\n2 1\n255\n";
        assert_eq!(&buf[..header.len()], header);
        assert_eq!(&buf[header.len()..], &rgb[..]);
    }
}
