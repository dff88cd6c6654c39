//! River mask for the game map.

use super::config::RiverProjectionStrategy;
use crate::hydrology::RiverClass;

/// 1 where a projected river runs, 0 elsewhere.
pub fn project_rivers(river_class: &[u8], strategy: RiverProjectionStrategy) -> Vec<u8> {
    let min = match strategy {
        RiverProjectionStrategy::MajorOnly(_) => RiverClass::Major,
        RiverProjectionStrategy::All(_) => RiverClass::Minor,
    };
    river_class
        .iter()
        .map(|&c| u8::from(c >= min.as_u8()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NoOptions;

    #[test]
    fn major_only_drops_minor_rivers() {
        let classes = [0, 1, 2, 1];
        assert_eq!(project_rivers(&classes, RiverProjectionStrategy::MajorOnly(NoOptions {})), vec![0, 0, 1, 0]);
        assert_eq!(project_rivers(&classes, RiverProjectionStrategy::All(NoOptions {})), vec![0, 1, 1, 1]);
    }
}
