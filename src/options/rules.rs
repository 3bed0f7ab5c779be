use crate::options::grid_options::GridOptions;

/// Option controls whose availability depends on other options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionField {
    /// Custom cell color picker.
    CellColorWheel,
    /// Custom group color picker.
    GroupColorWheel,
    /// Custom cluster color picker.
    ClusterColorWheel,
    /// Isometric reference color radio group.
    IsoVerticalColor,
    /// Custom isometric reference color picker.
    IsoVerticalColorWheel,
    /// Custom background color picker.
    BackgroundColorWheel,
}

type Rule = (OptionField, fn(&GridOptions) -> bool);

const RULES: &[Rule] = &[
    (OptionField::CellColorWheel, cell_wheel),
    (OptionField::GroupColorWheel, group_wheel),
    (OptionField::ClusterColorWheel, cluster_wheel),
    (OptionField::IsoVerticalColor, GridOptions::is_isometric),
    (OptionField::IsoVerticalColorWheel, iso_vertical_wheel),
    (OptionField::BackgroundColorWheel, background_wheel),
];

fn cell_wheel(o: &GridOptions) -> bool {
    o.cell_color.is_custom()
}

fn group_wheel(o: &GridOptions) -> bool {
    o.group_color.is_custom()
}

fn cluster_wheel(o: &GridOptions) -> bool {
    o.cluster_color.is_custom()
}

fn iso_vertical_wheel(o: &GridOptions) -> bool {
    o.is_isometric() && o.iso_vertical_color.is_custom()
}

fn background_wheel(o: &GridOptions) -> bool {
    o.background.is_custom()
}

/// Return `true` when `field` is editable under `options`.
pub fn is_enabled(field: OptionField, options: &GridOptions) -> bool {
    RULES
        .iter()
        .find(|(f, _)| *f == field)
        .is_none_or(|(_, enabled)| enabled(options))
}

/// Evaluate every rule, in table order.
pub fn enablement(options: &GridOptions) -> Vec<(OptionField, bool)> {
    RULES
        .iter()
        .map(|(field, enabled)| (*field, enabled(options)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/options/rules.rs"]
mod tests;
