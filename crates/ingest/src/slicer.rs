//! Episode selection for incremental refresh.

use episearch_core::Episode;

/// The trailing `target_rate` percent of the episode list.
///
/// The sidebar lists episodes oldest-first, so the trailing fraction is the
/// newest portion of the work. The start index is
/// `len * (100 - target_rate) / 100`, floored.
pub fn newest_slice(episodes: &[Episode], target_rate: u8) -> &[Episode] {
    let remainder = 100usize.saturating_sub(usize::from(target_rate));
    let start = episodes.len() * remainder / 100;
    &episodes[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_episodes(count: u64) -> Vec<Episode> {
        (0..count)
            .map(|i| Episode {
                work_id: 1,
                sub_title: String::new(),
                number: format!("{}", i + 1),
                episode_id: 100 + i,
            })
            .collect()
    }

    #[test]
    fn test_default_rate_selects_trailing_five_percent() {
        let episodes = make_episodes(100);
        let picked = newest_slice(&episodes, 5);
        assert_eq!(picked.len(), 5);
        assert_eq!(picked[0].episode_id, 195);
        assert_eq!(picked[4].episode_id, 199);
    }

    #[test]
    fn test_rate_zero_selects_nothing() {
        let episodes = make_episodes(40);
        assert!(newest_slice(&episodes, 0).is_empty());
    }

    #[test]
    fn test_rate_hundred_selects_everything() {
        let episodes = make_episodes(40);
        assert_eq!(newest_slice(&episodes, 100).len(), 40);
    }

    #[test]
    fn test_start_index_floors() {
        // 3 * 95 / 100 floors to 2, so one episode is selected.
        let episodes = make_episodes(3);
        let picked = newest_slice(&episodes, 5);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].episode_id, 102);
    }

    #[test]
    fn test_empty_list() {
        assert!(newest_slice(&[], 5).is_empty());
    }
}
