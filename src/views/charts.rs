//! Inline SVG charts: probability bar and attribution pie

use std::fmt::Write;

use super::page::escape;
use crate::logic::explain::FeatureContribution;

const BAR_WIDTH: f64 = 500.0;
const BAR_LEFT: f64 = 50.0;
const BAR_RIGHT: f64 = 20.0;

const PIE_SIZE: f64 = 300.0;
const PIE_RADIUS: f64 = 100.0;
/// Degrees, counter-clockwise from 3 o'clock
const PIE_START_ANGLE: f64 = 140.0;

/// Horizontal bar of the positive-class probability on a 0-1 axis
pub fn probability_bar(probability: f64) -> String {
    let p = probability.clamp(0.0, 1.0);
    let color = if p > 0.5 { "crimson" } else { "green" };
    let span = BAR_WIDTH - BAR_LEFT - BAR_RIGHT;

    let mut ticks = String::new();
    for i in 0..=5 {
        let value = i as f64 * 0.2;
        let x = BAR_LEFT + value * span;
        let _ = write!(
            ticks,
            r##"<line x1="{x:.1}" y1="40" x2="{x:.1}" y2="44" stroke="#333"/><text x="{x:.1}" y="56" font-size="10" text-anchor="middle">{value:.1}</text>"##,
            x = x,
            value = value
        );
    }

    format!(
        r##"<svg class="chart" width="{w}" height="80" viewBox="0 0 {w} 80" role="img" aria-label="Risk probability {pct:.2}%">
    <text x="{label_x}" y="26" font-size="12" text-anchor="end">Risk</text>
    <rect x="{left}" y="10" width="{bar:.2}" height="30" fill="{color}"/>
    <line x1="{left}" y1="40" x2="{right}" y2="40" stroke="#333"/>
    {ticks}
    <text x="{mid}" y="74" font-size="11" text-anchor="middle">Probability</text>
</svg>"##,
        w = BAR_WIDTH,
        pct = p * 100.0,
        label_x = BAR_LEFT - 6.0,
        left = BAR_LEFT,
        right = BAR_LEFT + span,
        bar = p * span,
        color = color,
        ticks = ticks,
        mid = BAR_LEFT + span / 2.0,
    )
}

/// Red ramp matching a sequential "Reds" colormap sampled between 0.4 and 0.8
fn red_ramp(index: usize, count: usize) -> String {
    const LIGHT: (f64, f64, f64) = (252.0, 138.0, 106.0);
    const DARK: (f64, f64, f64) = (203.0, 24.0, 29.0);

    let t = if count > 1 { index as f64 / (count - 1) as f64 } else { 0.0 };
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(LIGHT.0, DARK.0), mix(LIGHT.1, DARK.1), mix(LIGHT.2, DARK.2))
}

fn polar(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (cx + radius * radians.cos(), cy - radius * radians.sin())
}

/// Pie of the given contributions, each labelled with its share of the total.
/// `None` when every contribution is zero.
pub fn contribution_pie(contributions: &[FeatureContribution]) -> Option<String> {
    let total: f64 = contributions.iter().map(|c| c.importance).sum();
    if total.is_nan() || total <= 0.0 {
        return None;
    }

    let (cx, cy) = (PIE_SIZE / 2.0, PIE_SIZE / 2.0 + 10.0);
    let count = contributions.len();
    let mut slices = String::new();
    let mut labels = String::new();
    let mut angle = PIE_START_ANGLE;

    for (i, contribution) in contributions.iter().enumerate() {
        let share = contribution.importance / total;
        let sweep = share * 360.0;
        let color = red_ramp(i, count);

        if share >= 1.0 - 1e-12 {
            let _ = write!(slices, r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}"/>"#, cx = cx, cy = cy, r = PIE_RADIUS, color = color);
        } else if share > 0.0 {
            let (x1, y1) = polar(cx, cy, PIE_RADIUS, angle);
            let (x2, y2) = polar(cx, cy, PIE_RADIUS, angle + sweep);
            let large_arc = if sweep > 180.0 { 1 } else { 0 };
            let _ = write!(
                slices,
                r#"<path d="M {cx} {cy} L {x1:.2} {y1:.2} A {r} {r} 0 {large_arc} 0 {x2:.2} {y2:.2} Z" fill="{color}"/>"#,
                cx = cx,
                cy = cy,
                x1 = x1,
                y1 = y1,
                r = PIE_RADIUS,
                large_arc = large_arc,
                x2 = x2,
                y2 = y2,
                color = color
            );
        }

        let mid = angle + sweep / 2.0;
        let (lx, ly) = polar(cx, cy, PIE_RADIUS * 1.15, mid);
        let (px, py) = polar(cx, cy, PIE_RADIUS * 0.6, mid);
        let anchor = if lx < cx { "end" } else { "start" };
        let _ = write!(
            labels,
            r#"<text x="{lx:.2}" y="{ly:.2}" font-size="9" text-anchor="{anchor}">{name}</text><text x="{px:.2}" y="{py:.2}" font-size="9" text-anchor="middle">{pct:.1}%</text>"#,
            lx = lx,
            ly = ly,
            anchor = anchor,
            name = escape(contribution.name),
            px = px,
            py = py,
            pct = share * 100.0
        );

        angle += sweep;
    }

    Some(format!(
        r#"<svg class="chart" width="{size}" height="{height}" viewBox="0 0 {size} {height}" role="img" aria-label="Top contributing features">
    <text x="{cx}" y="14" font-size="11" text-anchor="middle">Top {count} Contributing Features</text>
    {slices}
    {labels}
</svg>"#,
        size = PIE_SIZE,
        height = PIE_SIZE + 20.0,
        cx = cx,
        count = count,
        slices = slices,
        labels = labels,
    ))
}
