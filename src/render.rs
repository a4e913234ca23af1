use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::path::Path;

use crate::error::{PartsError, Result};
use crate::parts::{Aggregate, Category, DateParts};

/// size in pixels of each subplot
pub const PANEL_SIZE: (u32, u32) = (500, 400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
}

/// One subplot: the value counts of a category drawn as a given chart
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub category: Category,
    pub kind: ChartKind,
    pub title: String,
}

impl Panel {
    pub fn new(category: Category, kind: ChartKind, title: &str) -> Panel {
        Panel {
            category,
            kind,
            title: title.to_string(),
        }
    }

    /// bar of the counts and pie of the shares of the category
    pub fn defaults(category: Category) -> Vec<Panel> {
        let (bar_title, pie_title) = match category {
            Category::IsWeekend => (
                "Record count, weekend vs weekday".to_string(),
                "Weekend share".to_string(),
            ),
            Category::WeekdayName => (
                "Activity count by day of week".to_string(),
                "Days of the week".to_string(),
            ),
            c => (format!("Record count by {}", c), format!("Share by {}", c)),
        };
        vec![
            Panel::new(category, ChartKind::Bar, &bar_title),
            Panel::new(category, ChartKind::Pie, &pie_title),
        ]
    }
}

/// Draws the panels side by side to the svg file fout.
/// Returns false, without writing anything, when there are no counts to draw.
pub fn display(parts: &DateParts, panels: &[Panel], fout: &Path) -> Result<bool> {
    if panels.is_empty() {
        return Err(PartsError::NoPanels);
    }
    let aggregates: Vec<Aggregate> = panels
        .iter()
        .map(|p| parts.value_counts(p.category))
        .collect();
    if aggregates.iter().all(|a| a.is_empty()) {
        warn!("no records to count, skipping the chart");
        return Ok(false);
    }
    let size = (PANEL_SIZE.0 * panels.len() as u32, PANEL_SIZE.1);
    let root = SVGBackend::new(fout, size).into_drawing_area();
    draw_panels(&root, panels, &aggregates)?;
    root.present()?;
    Ok(true)
}

/// one row of subplots, one per panel
pub fn draw_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panels: &[Panel],
    aggregates: &[Aggregate],
) -> Result<()> {
    root.fill(&WHITE)?;
    let areas = root.split_evenly((1, panels.len()));
    for ((area, panel), agg) in areas.iter().zip(panels.iter()).zip(aggregates.iter()) {
        debug!(
            "{:?} chart of {} with {} values",
            panel.kind,
            panel.category,
            agg.counts.len()
        );
        if agg.is_empty() {
            area.titled(&panel.title, ("sans-serif", 24))?;
            continue;
        }
        match panel.kind {
            ChartKind::Bar => draw_bar(area, agg, &panel.title)?,
            ChartKind::Pie => draw_pie(area, agg, &panel.title)?,
        }
    }
    Ok(())
}

fn draw_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    agg: &Aggregate,
    title: &str,
) -> Result<()> {
    let labels: Vec<&str> = agg.counts.iter().map(|(l, _)| l.as_str()).collect();
    let ymax = agg.counts.iter().map(|(_, c)| *c).max().unwrap_or(0) as u32;
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            (0u32..labels.len() as u32).into_segmented(),
            0u32..(ymax + ymax / 10 + 1),
        )?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(150, 150, 150).stroke_width(1))
        .label_style(("sans-serif", 16))
        .y_desc("count")
        .x_desc(agg.category.name())
        .x_labels(labels.len())
        .x_label_formatter(&|x: &SegmentValue<u32>| match x {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|l| l.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(RED.mix(0.4).filled())
            .margin(20)
            .data(
                agg.counts
                    .iter()
                    .enumerate()
                    .map(|(i, (_, c))| (i as u32, *c as u32)),
            ),
    )?;
    Ok(())
}

fn draw_pie<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    agg: &Aggregate,
    title: &str,
) -> Result<()> {
    let area = area.titled(title, ("sans-serif", 24))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = w.min(h) as f64 * 0.35;
    let label_style = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));

    // clockwise from twelve o'clock
    let mut start = 0f64;
    for (i, (label, share)) in agg.proportions().iter().enumerate() {
        let sweep = 2. * PI * share;
        let wedge = wedge_points(center, radius, start, sweep);
        let color = Palette99::pick(i).mix(0.8);
        area.draw(&Polygon::new(wedge.clone(), color.filled()))?;
        area.draw(&PathElement::new(wedge, BLACK.stroke_width(1)))?;
        let mid = polar(center, radius * 1.2, start + sweep / 2.);
        area.draw(&Text::new(
            format!("{} {:.1}%", label, share * 100.),
            mid,
            label_style.clone(),
        ))?;
        start += sweep;
    }
    Ok(())
}

fn polar(center: (i32, i32), r: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (r * angle.sin()).round() as i32,
        center.1 - (r * angle.cos()).round() as i32,
    )
}

/// closed outline of the wedge: center, arc from start to start + sweep, center
pub fn wedge_points(center: (i32, i32), r: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    // about 4 degrees per segment
    let steps = ((sweep / (2. * PI) * 90.).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 3);
    points.push(center);
    for k in 0..=steps {
        points.push(polar(center, r, start + sweep * k as f64 / steps as f64));
    }
    points.push(center);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn parts(dates: &[&str]) -> DateParts {
        let time: Vec<NaiveDateTime> = dates
            .iter()
            .map(|s| NaiveDateTime::parse_from_str(s, crate::DT_FORMAT).unwrap())
            .collect();
        DateParts::extract(&time)
    }

    #[test]
    fn default_panels_are_bar_and_pie() {
        let panels = Panel::defaults(Category::IsWeekend);
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].kind, ChartKind::Bar);
        assert_eq!(panels[1].kind, ChartKind::Pie);
        assert!(panels.iter().all(|p| p.category == Category::IsWeekend));
        assert_eq!(Panel::defaults(Category::Hour)[0].title, "Record count by hour");
    }

    #[test]
    fn no_panels_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = parts(&["2024-01-06 00:00:00"]);
        let err = display(&p, &[], &dir.path().join("out.svg")).unwrap_err();
        assert!(matches!(err, PartsError::NoPanels));
    }

    #[test]
    fn nothing_to_count_draws_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("out.svg");
        let drawn = display(&parts(&[]), &Panel::defaults(Category::IsWeekend), &fout).unwrap();
        assert!(!drawn);
        assert!(!fout.exists());
    }

    fn week() -> DateParts {
        parts(&[
            "2024-01-08 09:00:00",
            "2024-01-09 09:00:00",
            "2024-01-10 09:00:00",
            "2024-01-11 09:00:00",
            "2024-01-12 09:00:00",
            "2024-01-13 09:00:00",
            "2024-01-14 09:00:00",
        ])
    }

    #[test]
    fn weekend_bar_and_pie_to_svg() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("weekend.svg");
        let drawn = display(&week(), &Panel::defaults(Category::IsWeekend), &fout).unwrap();
        assert!(drawn);
        let svg = std::fs::read_to_string(&fout).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Weekend share"));
        assert!(svg.contains("weekday"));
        assert!(svg.contains("weekend"));
        // 5 of 7
        assert!(svg.contains("71.4%"));
        assert!(svg.contains("28.6%"));
    }

    #[test]
    fn weekday_names_to_svg() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("names.svg");
        let drawn = display(&week(), &Panel::defaults(Category::WeekdayName), &fout).unwrap();
        assert!(drawn);
        let svg = std::fs::read_to_string(&fout).unwrap();
        for name in ["Monday", "Wednesday", "Sunday"].iter() {
            assert!(svg.contains(*name), "{} missing", name);
        }
        assert!(svg.contains("14.3%"));
    }

    #[test]
    fn empty_panel_is_left_blank() {
        let week = week();
        let panels = vec![
            Panel::new(Category::IsWeekend, ChartKind::Pie, "Weekend share"),
            Panel::new(Category::Hour, ChartKind::Bar, "Nothing here"),
        ];
        let aggregates = vec![
            week.value_counts(Category::IsWeekend),
            parts(&[]).value_counts(Category::Hour),
        ];
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (2 * PANEL_SIZE.0, PANEL_SIZE.1))
                .into_drawing_area();
            draw_panels(&root, &panels, &aggregates).unwrap();
            root.present().unwrap();
        }
        assert!(svg.contains("71.4%"));
        assert!(svg.contains("Nothing here"));
        // no axis is drawn on the blank panel
        assert!(!svg.contains("count"));
    }

    #[test]
    fn wedge_is_closed_on_the_center() {
        let w = wedge_points((100, 100), 50., 0., PI);
        assert_eq!(w.first(), Some(&(100, 100)));
        assert_eq!(w.last(), Some(&(100, 100)));
        // from twelve o'clock clockwise to six o'clock
        assert_eq!(w[1], (100, 50));
        assert_eq!(w[w.len() - 2], (100, 150));
        assert!(w.iter().all(|p| p.0 >= 100));
    }

    #[test]
    fn full_circle_wedge() {
        let w = wedge_points((0, 0), 10., 0., 2. * PI);
        assert_eq!(w.len(), 90 + 3);
        assert_eq!(w[1], w[w.len() - 2]);
    }
}
