use iriscode_image::Image;

/// Per-column and per-row counts of the pixels matching a predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projections {
    /// One count per column, `len == width`.
    pub cols: Vec<u32>,
    /// One count per row, `len == height`.
    pub rows: Vec<u32>,
}

impl Projections {
    /// Total number of matching pixels.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|&c| c as u64).sum()
    }
}

/// Count, for every column and every row, the pixels for which `predicate` holds.
///
/// # Examples
///
/// ```
/// use iriscode_image::{Image, ImageSize};
/// use iriscode_imgproc::projection::project;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 3, height: 2 }, vec![
///     0, 255, 0,
///     0, 255, 255,
/// ]).unwrap();
///
/// let proj = project(&image, |v| v == 0);
/// assert_eq!(proj.cols, vec![2, 0, 1]);
/// assert_eq!(proj.rows, vec![2, 1]);
/// ```
pub fn project<T: Copy>(src: &Image<T, 1>, predicate: impl Fn(T) -> bool) -> Projections {
    let mut cols = vec![0u32; src.cols()];
    let mut rows = vec![0u32; src.rows()];

    for (y, row_count) in rows.iter_mut().enumerate() {
        let Some(row) = src.row(y) else {
            break;
        };
        for (&v, col_count) in row.iter().zip(cols.iter_mut()) {
            if predicate(v) {
                *col_count += 1;
                *row_count += 1;
            }
        }
    }

    Projections { cols, rows }
}

/// Index of the first maximum of a profile, `None` for an empty profile.
///
/// # Examples
///
/// ```
/// use iriscode_imgproc::projection::argmax;
///
/// assert_eq!(argmax(&[1, 5, 3, 5]), Some(1));
/// assert_eq!(argmax(&[]), None);
/// ```
pub fn argmax(profile: &[u32]) -> Option<usize> {
    profile
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u32)>, (i, &v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
