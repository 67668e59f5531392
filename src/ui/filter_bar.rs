//! Header above the image list: breadcrumb trail plus the active filters.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::core::filter::{self, FilterCriteria};
use crate::core::folders;
use crate::ui::theme::Theme;

pub struct FilterBar<'a> {
    pub block: Block<'a>,
    pub current_folder: &'a str,
    pub criteria: &'a FilterCriteria,
    pub shown: usize,
    pub total: usize,
}

impl<'a> FilterBar<'a> {
    fn crumb_line(&self) -> Line<'static> {
        let crumbs = folders::breadcrumbs(self.current_folder);
        let last = crumbs.len() - 1;
        let mut spans = Vec::with_capacity(crumbs.len() * 2);
        for (i, crumb) in crumbs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" › ", Theme::meta_style()));
            }
            let style = if i == last {
                Theme::title_style()
            } else {
                Theme::folder_style()
            };
            spans.push(Span::styled(crumb.label, style));
        }
        spans.push(Span::styled(
            format!("   {} of {} images", self.shown, self.total),
            Theme::meta_style(),
        ));
        Line::from(spans)
    }

    fn filter_line(&self) -> Line<'static> {
        let c = self.criteria;
        let style_for = |active: bool| {
            if active {
                Theme::filter_active_style()
            } else {
                Theme::filter_idle_style()
            }
        };
        let name = if c.name_pattern.is_empty() {
            "—".to_string()
        } else {
            format!("\"{}\"", c.name_pattern)
        };
        let label = Style::default().add_modifier(Modifier::BOLD);

        Line::from(vec![
            Span::styled("Name: ", label),
            Span::styled(name, style_for(!c.name_pattern.is_empty())),
            Span::styled("   Size: ", label),
            Span::styled(c.size_class.label(), style_for(c.size_class != Default::default())),
            Span::styled("   Date: ", label),
            Span::styled(filter::age_label(c.max_age_days), style_for(c.max_age_days.is_some())),
        ])
    }
}

impl<'a> Widget for FilterBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.inner(area);
        self.block.clone().render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        Paragraph::new(vec![self.crumb_line(), self.filter_line()]).render(inner, buf);
    }
}
