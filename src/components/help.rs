use color_eyre::eyre::Result;
use derive_builder::Builder;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Padding, Row, Table, Widget},
};

use crate::config::{key_event_to_string, Bindings};

type Group = (String, Vec<(String, String)>);

/// Overlay listing every key binding, one bordered table per group.
#[derive(Debug, Builder)]
pub struct Help {
    groups: Vec<Group>,
    #[builder(default = "5")]
    column_spacing: u16,
    #[builder(default = "1")]
    margin_vertical: u16,
    #[builder(default = "2")]
    margin_horizontal: u16,
}

impl Help {
    pub fn new(groups: Vec<(&str, &Bindings)>) -> Result<Self> {
        let groups = groups
            .into_iter()
            .map(|(name, bindings)| {
                let mut rows: Vec<(String, String)> =
                    bindings.iter().map(|(key, action)| (key_event_to_string(key), action.label())).collect();
                rows.sort();
                (name.to_string(), rows)
            })
            .collect();

        Ok(HelpBuilder::default().groups(groups).build()?)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    fn render_group(&self, area: Rect, buf: &mut Buffer, (name, rows): &Group, key_length: u16, val_length: u16) {
        let rows: Vec<Row> = rows.iter().map(|(key, val)| Row::new(vec![key.clone(), val.clone()])).collect();
        let widths = [Constraint::Length(key_length), Constraint::Min(val_length)];

        let table = Table::new(rows, widths)
            .column_spacing(self.column_spacing)
            .header(Row::new(vec!["Key", "Command"]).style(Style::new().bold()).bottom_margin(1))
            .block(
                Block::new()
                    .title(name.clone())
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::new().bold().fg(Color::Cyan))
                    .padding(Padding::symmetric(self.margin_horizontal, self.margin_vertical)),
            );

        Clear.render(area, buf);
        table.render(area, buf);
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = || self.groups.iter().flat_map(|(_, rows)| rows.iter());
        let key_length = rows().map(|(key, _)| key.len()).max().unwrap_or(0).max("Key".len()) as u16;
        let val_length = rows().map(|(_, val)| val.len()).max().unwrap_or(0).max("Command".len()) as u16;

        // columns + spacing + padding + border
        let width = key_length + val_length + self.column_spacing + self.margin_horizontal * 2 + 2;
        // rows + header + padding + border
        let heights: Vec<Constraint> = self
            .groups
            .iter()
            .map(|(_, rows)| Constraint::Length(rows.len() as u16 + 2 + self.margin_vertical * 2 + 2))
            .collect();

        let [column] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(area);
        let areas = Layout::default().direction(Direction::Vertical).flex(Flex::Center).constraints(heights).split(column);

        for (group, area) in self.groups.iter().zip(areas.iter()) {
            self.render_group(*area, buf, group, key_length, val_length);
        }
    }
}
