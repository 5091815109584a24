use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed source row/column for every destination pixel
pub struct ScaleLut {
    dst_w: usize,
    src_w: usize,
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        Self {
            dst_w,
            src_w,
            src_x: nearest_indices(dst_w, src_w),
            src_y: nearest_indices(dst_h, src_h),
        }
    }

    pub fn matches(&self, dst_w: usize, dst_h: usize) -> bool {
        self.dst_w == dst_w && self.src_y.len() == dst_h
    }
}

fn nearest_indices(dst: usize, src: usize) -> Vec<usize> {
    (0..dst)
        .map(|d| (d * src / dst.max(1)).min(src.saturating_sub(1)))
        .collect()
}

/// Nearest-neighbour stretch; flat-shaded walls stay crisp.
/// Rows are processed in parallel.
pub fn blit_nearest_stretch(dst: &mut [u32], src: &[u32], lut: &ScaleLut) {
    if lut.dst_w == 0 {
        return;
    }
    dst.par_chunks_mut(lut.dst_w)
        .zip(lut.src_y.par_iter())
        .for_each(|(dst_row, &sy)| {
            let src_row = &src[sy * lut.src_w..(sy + 1) * lut.src_w];
            for (px, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *px = src_row[sx];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_sizes_match() {
        let src: Vec<u32> = (0..12).collect();
        let lut = ScaleLut::new(4, 3, 4, 3);
        let mut dst = vec![0; 12];
        blit_nearest_stretch(&mut dst, &src, &lut);
        assert_eq!(dst, src);
    }

    #[test]
    fn doubles_each_pixel() {
        let src = vec![1, 2, 3, 4]; // 2x2
        let lut = ScaleLut::new(4, 4, 2, 2);
        let mut dst = vec![0; 16];
        blit_nearest_stretch(&mut dst, &src, &lut);
        assert_eq!(
            dst,
            vec![1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]
        );
    }

    #[test]
    fn shrinks_by_sampling() {
        let src: Vec<u32> = (0..16).collect(); // 4x4
        let lut = ScaleLut::new(2, 2, 4, 4);
        let mut dst = vec![0; 4];
        blit_nearest_stretch(&mut dst, &src, &lut);
        assert_eq!(dst, vec![0, 2, 8, 10]);
        assert!(lut.matches(2, 2));
        assert!(!lut.matches(4, 2));
    }
}
