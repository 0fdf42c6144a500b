/// Map a possibly out-of-range index into `[0, len)` by mirroring around the
/// edge pixels without repeating them (`gfedcb|abcdefgh|gfedcba`).
#[inline]
pub fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let n = len as isize;
    let period = 2 * n - 2;
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}

/// Map a possibly out-of-range index into `[0, len)` by repeating the edge
/// pixels (`aaaaaa|abcdefgh|hhhhhhh`).
#[inline]
pub fn replicate(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_101() {
        let mapped = (-3..8).map(|i| reflect_101(i, 5)).collect::<Vec<_>>();
        assert_eq!(mapped, vec![3, 2, 1, 0, 1, 2, 3, 4, 3, 2, 1]);
        assert_eq!(reflect_101(-4, 1), 0);
        assert_eq!(reflect_101(-20, 3), 0);
    }

    #[test]
    fn test_replicate() {
        let mapped = (-2..6).map(|i| replicate(i, 4)).collect::<Vec<_>>();
        assert_eq!(mapped, vec![0, 0, 0, 1, 2, 3, 3, 3]);
    }
}
