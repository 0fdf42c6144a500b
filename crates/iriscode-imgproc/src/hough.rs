//! Circle Hough transform over an edge map, using gradient directions.
//!
//! Centers are found first: each edge pixel votes along its gradient line, in
//! both directions, for every radius of the search band. The accumulator is
//! smoothed with a 5x5 tent, since gradient directions on a digitized circle
//! scatter the votes around the true center, and its local maxima above the
//! vote threshold become center candidates. For each
//! candidate, strongest first, the radius with the densest edge support is then
//! picked from a histogram of edge distances. Edge pixels supporting an accepted
//! circle are consumed and do not support later candidates.

use iriscode_image::{Image, ImageError};

/// Parameters of the circle Hough transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoughCirclesParams {
    /// Inverse accumulator resolution, values below 1 are treated as 1.
    pub dp: f32,
    /// Minimum distance between the centers of two detected circles.
    pub min_dist: f32,
    /// Edge support a radius must exceed, the smoothed center score must exceed
    /// nine times this value.
    pub acc_threshold: u32,
    /// Smallest radius searched, in pixels.
    pub min_radius: u32,
    /// Largest radius searched, in pixels.
    pub max_radius: u32,
}

/// A detected circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoughCircle {
    /// Center column.
    pub x: f32,
    /// Center row.
    pub y: f32,
    /// Radius in pixels.
    pub radius: f32,
    /// Edge pixels supporting the radius.
    pub support: u32,
}

/// Detect circles in an edge map.
///
/// # Arguments
///
/// * `edges` - Edge map, any non-zero pixel is an edge.
/// * `dx` - Horizontal derivative of the image the edges were computed from.
/// * `dy` - Vertical derivative of the image the edges were computed from.
/// * `params` - Search parameters.
///
/// # Returns
///
/// The detected circles, ordered by decreasing center votes.
pub fn hough_circles(
    edges: &Image<u8, 1>,
    dx: &Image<f32, 1>,
    dy: &Image<f32, 1>,
    params: &HoughCirclesParams,
) -> Result<Vec<HoughCircle>, ImageError> {
    for other in [dx.size(), dy.size()] {
        if other != edges.size() {
            return Err(ImageError::InvalidImageSize(
                edges.cols(),
                edges.rows(),
                other.width,
                other.height,
            ));
        }
    }

    let min_radius = params.min_radius.max(1);
    let max_radius = params.max_radius;
    if min_radius > max_radius || edges.size().area() == 0 {
        return Ok(Vec::new());
    }

    let dp = params.dp.max(1.0);
    let (rows, cols) = (edges.rows(), edges.cols());
    let acc_cols = (cols as f32 / dp).ceil() as usize;
    let acc_rows = (rows as f32 / dp).ceil() as usize;
    let mut accumulator = vec![0u32; acc_cols * acc_rows];

    let mut points = Vec::new();
    for (idx, &e) in edges.as_slice().iter().enumerate() {
        if e == 0 {
            continue;
        }
        let (x, y) = ((idx % cols) as f32, (idx / cols) as f32);
        points.push((x, y));

        let (gx, gy) = (dx.as_slice()[idx], dy.as_slice()[idx]);
        let mag = (gx * gx + gy * gy).sqrt();
        if mag == 0.0 {
            continue;
        }
        let (ux, uy) = (gx / mag, gy / mag);

        for sign in [1.0f32, -1.0] {
            for r in min_radius..=max_radius {
                let cx = ((x + sign * r as f32 * ux) / dp).round();
                let cy = ((y + sign * r as f32 * uy) / dp).round();
                // moving along a ray, a point that left the accumulator never re-enters
                if cx < 0.0 || cy < 0.0 || cx >= acc_cols as f32 || cy >= acc_rows as f32 {
                    break;
                }
                accumulator[cy as usize * acc_cols + cx as usize] += 1;
            }
        }
    }

    let centers = find_centers(&accumulator, acc_cols, acc_rows, params.acc_threshold);

    let min_dist_sq = params.min_dist * params.min_dist;
    let mut histogram = vec![0u32; max_radius as usize + 2];
    let mut circles: Vec<HoughCircle> = Vec::new();

    for (_, center_idx) in centers {
        let cx = (center_idx % acc_cols) as f32 * dp;
        let cy = (center_idx / acc_cols) as f32 * dp;

        let too_close = circles.iter().any(|c| {
            let (ddx, ddy) = (c.x - cx, c.y - cy);
            ddx * ddx + ddy * ddy < min_dist_sq
        });
        if too_close {
            continue;
        }

        let distance = |&(px, py): &(f32, f32)| -> u32 {
            ((px - cx).powi(2) + (py - cy).powi(2)).sqrt().round() as u32
        };

        histogram.iter_mut().for_each(|h| *h = 0);
        for d in points.iter().map(distance) {
            if d >= min_radius && d <= max_radius {
                histogram[d as usize] += 1;
            }
        }

        if let Some((radius, support)) =
            best_radius(&histogram, min_radius, max_radius, params.acc_threshold)
        {
            points.retain(|p| distance(p).abs_diff(radius) > 1);
            circles.push(HoughCircle {
                x: cx,
                y: cy,
                radius: radius as f32,
                support,
            });
        }
    }

    Ok(circles)
}

/// Sum of each cell's 3x3 neighbourhood, cells outside the grid count as zero.
fn box_sum_3x3(values: &[u32], cols: usize, rows: usize) -> Vec<u32> {
    let mut horizontal = vec![0u32; values.len()];
    for (src, dst) in values.chunks_exact(cols).zip(horizontal.chunks_exact_mut(cols)) {
        for x in 0..cols {
            let lo = x.saturating_sub(1);
            let hi = (x + 2).min(cols);
            dst[x] = src[lo..hi].iter().sum();
        }
    }

    let mut out = vec![0u32; values.len()];
    for y in 0..rows {
        let lo = y.saturating_sub(1);
        let hi = (y + 2).min(rows);
        for x in 0..cols {
            out[y * cols + x] = (lo..hi).map(|yy| horizontal[yy * cols + x]).sum();
        }
    }
    out
}

/// Local maxima of the tent smoothed accumulator, as `(score, index)` sorted by
/// decreasing score and then raster order.
///
/// The score is the 5x5 tent weighted vote count. Its weights sum to 81, so
/// the score must exceed `9 * threshold`, the score of a uniform field of
/// `threshold / 9` votes per cell.
fn find_centers(
    accumulator: &[u32],
    acc_cols: usize,
    acc_rows: usize,
    threshold: u32,
) -> Vec<(u32, usize)> {
    let smoothed = box_sum_3x3(&box_sum_3x3(accumulator, acc_cols, acc_rows), acc_cols, acc_rows);
    let min_score = threshold.saturating_mul(9);

    let mut centers = Vec::new();
    for y in 1..acc_rows.saturating_sub(1) {
        for x in 1..acc_cols.saturating_sub(1) {
            let idx = y * acc_cols + x;
            let v = smoothed[idx];
            if v > min_score
                && v > smoothed[idx - 1]
                && v >= smoothed[idx + 1]
                && v > smoothed[idx - acc_cols]
                && v >= smoothed[idx + acc_cols]
            {
                centers.push((v, idx));
            }
        }
    }
    centers.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    centers
}

/// Radius with the densest support (`count / r`), requiring the support of the
/// `r - 1..=r + 1` window to exceed `threshold`. Smaller radii win ties.
fn best_radius(
    histogram: &[u32],
    min_radius: u32,
    max_radius: u32,
    threshold: u32,
) -> Option<(u32, u32)> {
    let mut best: Option<(u32, u32, f32)> = None;
    for r in min_radius..=max_radius {
        let ri = r as usize;
        let support = histogram[ri - 1] + histogram[ri] + histogram[ri + 1];
        if support <= threshold {
            continue;
        }
        let score = histogram[ri] as f32 / r as f32;
        match best {
            Some((_, _, best_score)) if best_score >= score => {}
            _ => best = Some((r, support, score)),
        }
    }
    best.map(|(r, support, _)| (r, support))
}
