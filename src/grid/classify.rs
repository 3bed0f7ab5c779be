/// Periodicity level a grid line index belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Finest lines, every pitch step that is not a group or cluster line.
    Cell,
    /// Every `cells_per_group`-th line that is not a cluster line.
    Group,
    /// Every `cells_per_group * groups_per_cluster`-th line.
    Cluster,
}

impl Level {
    /// Drawing order: finest first so coarser structure ends up on top.
    pub const ALL: [Level; 3] = [Level::Cell, Level::Group, Level::Cluster];
}

/// Lines between two consecutive cluster lines.
pub fn cluster_period(cells_per_group: u32, groups_per_cluster: u32) -> u32 {
    cells_per_group
        .max(1)
        .saturating_mul(groups_per_cluster.max(1))
}

/// Partition line indices into exactly one [`Level`].
///
/// Cluster membership wins over group membership, which wins over cell. Zero periods are treated
/// as one so the function stays total.
pub fn classify(i: u32, cells_per_group: u32, groups_per_cluster: u32) -> Level {
    let group = cells_per_group.max(1);
    if i % cluster_period(cells_per_group, groups_per_cluster) == 0 {
        Level::Cluster
    } else if i % group == 0 {
        Level::Group
    } else {
        Level::Cell
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/classify.rs"]
mod tests;
