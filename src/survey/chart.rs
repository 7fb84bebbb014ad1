// Pie charts of the frequency tables, in SVG format.

use log::debug;
use plotters::element::Pie;
use plotters::prelude::*;
use ranked_traits::DisplayGrouping;
use snafu::prelude::*;

use crate::survey::*;

pub const OTHERS_LABEL: &str = "Others";

const CHART_SIZE: (u32, u32) = (640, 640);

/// The "Paired" qualitative palette.
pub const TOP_PALETTE: [RGBColor; 12] = [
    RGBColor(166, 206, 227),
    RGBColor(31, 120, 180),
    RGBColor(178, 223, 138),
    RGBColor(51, 160, 44),
    RGBColor(251, 154, 153),
    RGBColor(227, 26, 28),
    RGBColor(253, 191, 111),
    RGBColor(255, 127, 0),
    RGBColor(202, 178, 214),
    RGBColor(106, 61, 154),
    RGBColor(255, 255, 153),
    RGBColor(177, 89, 40),
];

/// The "Set3" qualitative palette.
pub const BOTTOM_PALETTE: [RGBColor; 12] = [
    RGBColor(141, 211, 199),
    RGBColor(255, 255, 179),
    RGBColor(190, 186, 218),
    RGBColor(251, 128, 114),
    RGBColor(128, 177, 211),
    RGBColor(253, 180, 98),
    RGBColor(179, 222, 105),
    RGBColor(252, 205, 229),
    RGBColor(217, 217, 217),
    RGBColor(188, 128, 189),
    RGBColor(204, 235, 197),
    RGBColor(255, 237, 111),
];

/// The sizes and labels of the slices, featured traits first.
///
/// Featured traits are labelled with the share of respondents that selected them.
/// The "Others" slice has no percentage.
pub fn pie_slices(grouping: &DisplayGrouping) -> (Vec<f64>, Vec<String>) {
    let mut sizes: Vec<f64> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    for f in grouping.featured.iter() {
        sizes.push(f.count as f64);
        labels.push(format!("{} {:.1}%", f.name, f.percentage));
    }
    if let Some(others) = &grouping.others {
        sizes.push(others.count as f64);
        labels.push(OTHERS_LABEL.to_string());
    }
    (sizes, labels)
}

pub fn render_pie_svg(
    title: &str,
    grouping: &DisplayGrouping,
    palette: &[RGBColor],
) -> SurveyResult<String> {
    let (sizes, labels) = pie_slices(grouping);
    debug!("render_pie_svg: {:?} labels: {:?}", title, labels);
    // Slices beyond the palette reuse its colors.
    let colors: Vec<RGBColor> = palette.iter().cycle().take(sizes.len()).cloned().collect();

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).context(RenderingChartSnafu { title })?;
        let area = root
            .titled(title, ("sans-serif", 24))
            .context(RenderingChartSnafu { title })?;
        if sizes.iter().sum::<f64>() > 0.0 && !colors.is_empty() {
            let dims = area.dim_in_pixel();
            let center = (dims.0 as i32 / 2, dims.1 as i32 / 2);
            let radius = dims.0.min(dims.1) as f64 * 0.3;
            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(140.0);
            pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
            area.draw(&pie).context(RenderingChartSnafu { title })?;
        }
        root.present().context(RenderingChartSnafu { title })?;
    }
    Ok(buffer)
}
