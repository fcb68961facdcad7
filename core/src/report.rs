use alloc::vec::Vec;
use core::fmt;

const SAMPLE_LEN: usize = 10;

/// Summary of a packed frame, used when working out which layout a dump uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub width: u32,
    pub height: u32,
    pub len: usize,
    /// `width * height / 8`
    pub expected_len: usize,
    pub non_zero: usize,
    pub head: Vec<u8>,
    pub tail: Vec<u8>,
    /// The first `width` bytes, one page in the page layouts.
    pub first_page: Vec<u8>,
}

impl FrameReport {
    pub fn analyze(data: &[u8], width: u32, height: u32) -> Self {
        let head_len = data.len().min(SAMPLE_LEN);
        let tail_start = data.len().saturating_sub(SAMPLE_LEN);
        let page_len = data.len().min(width as usize);
        Self {
            width,
            height,
            len: data.len(),
            expected_len: width as usize * height as usize / 8,
            non_zero: data.iter().filter(|&&b| b != 0).count(),
            head: data[..head_len].to_vec(),
            tail: data[tail_start..].to_vec(),
            first_page: data[..page_len].to_vec(),
        }
    }

    pub fn size_matches(&self) -> bool {
        self.len == self.expected_len
    }

    pub fn non_zero_percent(&self) -> f32 {
        if self.len == 0 {
            0.0
        } else {
            self.non_zero as f32 * 100.0 / self.len as f32
        }
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total bytes: {}", self.len)?;
        writeln!(
            f,
            "Expected bytes for {}x{}: {}",
            self.width, self.height, self.expected_len
        )?;
        if self.size_matches() {
            writeln!(f, "Frame size matches expected")?;
        } else {
            writeln!(
                f,
                "Frame size mismatch: got {}, expected {}",
                self.len, self.expected_len
            )?;
        }
        writeln!(f, "First {SAMPLE_LEN} bytes: {:?}", self.head)?;
        writeln!(f, "Last {SAMPLE_LEN} bytes: {:?}", self.tail)?;
        writeln!(
            f,
            "Non-zero bytes: {}/{} ({:.1}%)",
            self.non_zero,
            self.len,
            self.non_zero_percent()
        )?;
        write!(f, "First page bytes: {:?}", self.first_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::ToString, vec};

    #[test]
    fn full_frame() {
        let mut data = vec![0u8; 128];
        data[0] = 1;
        data[127] = 2;
        data[40] = 3;
        let report = FrameReport::analyze(&data, 32, 32);
        assert!(report.size_matches());
        assert_eq!(report.non_zero, 3);
        assert_eq!(report.head.len(), 10);
        assert_eq!(report.head[0], 1);
        assert_eq!(report.tail.last(), Some(&2));
        assert_eq!(report.first_page.len(), 32);
        assert!((report.non_zero_percent() - 2.34375).abs() < 1e-4);
    }

    #[test]
    fn short_and_empty_frames() {
        let report = FrameReport::analyze(&[5, 0, 7], 32, 32);
        assert!(!report.size_matches());
        assert_eq!(report.head, vec![5, 0, 7]);
        assert_eq!(report.tail, vec![5, 0, 7]);
        assert_eq!(report.first_page, vec![5, 0, 7]);

        let report = FrameReport::analyze(&[], 8, 8);
        assert_eq!(report.non_zero_percent(), 0.0);
        assert!(report.to_string().contains("mismatch: got 0, expected 8"));
    }
}
