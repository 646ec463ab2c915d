// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Straight-line segment detection over a binarized raster.
//
// A Hough-style accumulator finds candidate (rho, theta) lines; each
// candidate is then traced through the foreground mask, collecting pixel
// runs whose gaps stay within `max_line_gap` and whose length reaches
// `min_line_length`. Accepted runs consume their pixels so collinear
// candidates cannot re-emit the same feature.
//
// `imageproc::hough::detect_lines` returns infinite polar lines only; the
// crop rules downstream need finite segments with endpoint coordinates, so
// the segment stage is implemented here. Everything is deterministic: no
// sampling, fixed candidate ordering, identical input produces an identical
// segment set.

use image::GrayImage;
use tracing::{debug, trace};

/// A detected straight line segment, in pixel coordinates of the image that
/// produced it. Derived and ephemeral — never compared across images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    /// Horizontal extent |x2 - x1|.
    pub fn x_span(&self) -> u32 {
        self.x1.abs_diff(self.x2)
    }

    /// Vertical extent |y2 - y1|.
    pub fn y_span(&self) -> u32 {
        self.y1.abs_diff(self.y2)
    }

    /// Euclidean endpoint distance.
    pub fn length(&self) -> f64 {
        let dx = (self.x2 - self.x1) as f64;
        let dy = (self.y2 - self.y1) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when the segment deviates from horizontal by at most `tol`
    /// pixels over its whole extent.
    pub fn is_horizontal(&self, tol: u32) -> bool {
        self.y_span() <= tol
    }

    /// True when the segment deviates from vertical by at most `tol` pixels.
    pub fn is_vertical(&self, tol: u32) -> bool {
        self.x_span() <= tol
    }

    /// The segment's y-range as (min, max).
    pub fn y_range(&self) -> (i32, i32) {
        (self.y1.min(self.y2), self.y1.max(self.y2))
    }
}

/// Tuning parameters for [`detect_segments`].
#[derive(Debug, Clone, Copy)]
pub struct LineDetectionParams {
    /// Minimum accumulator votes for a (rho, theta) cell to be traced.
    pub vote_threshold: u32,
    /// Minimum endpoint distance for a run to be emitted, in pixels.
    pub min_line_length: u32,
    /// Largest foreground gap bridged within a single run, in pixels.
    pub max_line_gap: u32,
    /// Angular accumulator resolution in degrees.
    pub angle_step_degrees: f32,
}

impl Default for LineDetectionParams {
    fn default() -> Self {
        Self {
            vote_threshold: 50,
            min_line_length: 50,
            max_line_gap: 5,
            angle_step_degrees: 1.0,
        }
    }
}

/// Binarize with a fixed global cutoff, inverted: pixels darker than
/// `cutoff` become foreground (255), everything else background (0).
pub fn binarize_inverted(gray: &GrayImage, cutoff: u8) -> GrayImage {
    let mut out = GrayImage::new(gray.width(), gray.height());
    for (src, dst) in gray.pixels().zip(out.pixels_mut()) {
        dst.0[0] = if src.0[0] < cutoff { 255 } else { 0 };
    }
    out
}

/// Detect straight line segments in a binary image (foreground != 0).
///
/// Returns all segments whose supporting run satisfies the parameters. The
/// order of the returned sequence carries no meaning; callers filter and
/// sort for themselves.
pub fn detect_segments(binary: &GrayImage, params: &LineDetectionParams) -> Vec<LineSegment> {
    let (w, h) = binary.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let n_theta = ((180.0 / params.angle_step_degrees.max(0.1)) as usize).max(1);
    let diag = ((w as f64).powi(2) + (h as f64).powi(2)).sqrt().ceil() as i64;
    let n_rho = (2 * diag + 1) as usize;

    let trig: Vec<(f64, f64)> = (0..n_theta)
        .map(|t| {
            let theta = (t as f64 * params.angle_step_degrees as f64).to_radians();
            (theta.cos(), theta.sin())
        })
        .collect();

    // Mutable foreground mask; accepted runs clear their pixels here.
    let mut remaining: Vec<bool> = binary.pixels().map(|p| p.0[0] != 0).collect();

    // Vote accumulation over every foreground pixel.
    let mut votes = vec![0u32; n_theta * n_rho];
    for y in 0..h {
        for x in 0..w {
            if !remaining[(y * w + x) as usize] {
                continue;
            }
            for (t, &(cos_t, sin_t)) in trig.iter().enumerate() {
                let rho = (x as f64 * cos_t + y as f64 * sin_t).round() as i64;
                votes[t * n_rho + (rho + diag) as usize] += 1;
            }
        }
    }

    // Candidate cells in a fixed order: strongest first, ties broken by
    // (theta, rho) so repeated invocations trace identically.
    let mut candidates: Vec<(u32, usize, usize)> = Vec::new();
    for t in 0..n_theta {
        for r in 0..n_rho {
            let v = votes[t * n_rho + r];
            if v >= params.vote_threshold {
                candidates.push((v, t, r));
            }
        }
    }
    candidates.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
    trace!(candidates = candidates.len(), "hough candidates above threshold");

    let mut segments = Vec::new();
    for (_, t, r) in candidates {
        let (cos_t, sin_t) = trig[t];
        let rho = (r as i64 - diag) as f64;
        trace_candidate(&mut remaining, w, h, cos_t, sin_t, rho, params, &mut segments);
    }

    debug!(segments = segments.len(), "line segments detected");
    segments
}

/// Walk one candidate line across the image, emitting qualifying runs.
#[allow(clippy::too_many_arguments)]
fn trace_candidate(
    remaining: &mut [bool],
    w: u32,
    h: u32,
    cos_t: f64,
    sin_t: f64,
    rho: f64,
    params: &LineDetectionParams,
    out: &mut Vec<LineSegment>,
) {
    // Walk along the dominant axis so every step advances one pixel. For a
    // mostly-horizontal line (|sin| >= |cos|) that is x; otherwise y. The
    // divisor is then bounded away from zero.
    let walk_x = sin_t.abs() >= cos_t.abs();
    let steps = if walk_x { w } else { h };

    let mut start: Option<(i32, i32)> = None;
    let mut end = (0i32, 0i32);
    let mut gap = 0u32;
    // Pixels matched by the current run; cleared from `remaining` only when
    // the run is accepted, so a rejected run leaves evidence for other
    // candidates.
    let mut pending: Vec<usize> = Vec::new();

    let mut flush = |start: &mut Option<(i32, i32)>,
                     end: (i32, i32),
                     pending: &mut Vec<usize>,
                     remaining: &mut [bool],
                     out: &mut Vec<LineSegment>| {
        if let Some(s) = start.take() {
            let seg = LineSegment {
                x1: s.0,
                y1: s.1,
                x2: end.0,
                y2: end.1,
            };
            if seg.length() >= params.min_line_length as f64 {
                for &idx in pending.iter() {
                    remaining[idx] = false;
                }
                out.push(seg);
            }
        }
        pending.clear();
    };

    for i in 0..steps {
        let (xf, yf) = if walk_x {
            let x = i as f64;
            (x, (rho - x * cos_t) / sin_t)
        } else {
            let y = i as f64;
            ((rho - y * sin_t) / cos_t, y)
        };
        let xi = xf.round() as i64;
        let yi = yf.round() as i64;

        let hit = probe(remaining, w, h, xi, yi, walk_x, &mut pending);
        if hit {
            if start.is_none() {
                start = Some((xi as i32, yi as i32));
                gap = 0;
            }
            end = (xi as i32, yi as i32);
            gap = 0;
        } else if start.is_some() {
            gap += 1;
            if gap > params.max_line_gap {
                flush(&mut start, end, &mut pending, remaining, out);
            }
        }
    }
    flush(&mut start, end, &mut pending, remaining, out);
}

/// Check the traced pixel and its one-pixel perpendicular neighbours for
/// remaining foreground; matched indices are recorded in `pending`.
fn probe(
    remaining: &[bool],
    w: u32,
    h: u32,
    xi: i64,
    yi: i64,
    walk_x: bool,
    pending: &mut Vec<usize>,
) -> bool {
    let mut hit = false;
    for d in -1i64..=1 {
        let (px, py) = if walk_x { (xi, yi + d) } else { (xi + d, yi) };
        if px < 0 || py < 0 || px >= w as i64 || py >= h as i64 {
            continue;
        }
        let idx = (py as u32 * w + px as u32) as usize;
        if remaining[idx] {
            pending.push(idx);
            hit = true;
        }
    }
    hit
}
