use chrono::{DateTime, Utc};
use status_core::{BadgeClass, PollerViewModel};
use status_engine::InMemoryBadge;

pub fn render_board(
    now: DateTime<Utc>,
    view: &PollerViewModel,
    badges: &[(String, InMemoryBadge)],
) -> Vec<String> {
    let mut lines = Vec::with_capacity(badges.len() + 2);
    lines.push(format!(
        "Status board @ {} | {:?} | requests {} issued, {} applied, {} failed, {} stale, {} in flight",
        now.format("%Y-%m-%d %H:%M:%S UTC"),
        view.phase,
        view.cycles_issued,
        view.cycles_applied,
        view.failures,
        view.stale_discarded,
        view.in_flight,
    ));
    let summary = &view.summary;
    lines.push(format!(
        "Websites: {} total, {} completed, {} scraping, {} failed, {} other",
        summary.total, summary.completed, summary.scraping, summary.failed, summary.other
    ));
    for (selector, badge) in badges {
        lines.push(format!(
            "  {:<40} [{:<12}] {}",
            selector,
            status_class(badge),
            badge.text
        ));
    }
    lines
}

fn status_class(badge: &InMemoryBadge) -> &'static str {
    badge
        .classes
        .iter()
        .find_map(|class| BadgeClass::from_css_class(class))
        .map_or("-", BadgeClass::css_class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use status_core::{PollerPhase, StatusSummary};

    #[test]
    fn board_lists_header_summary_and_badges() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        let view = PollerViewModel {
            phase: PollerPhase::Polling,
            cycles_issued: 3,
            cycles_applied: 2,
            failures: 1,
            summary: StatusSummary {
                total: 2,
                completed: 1,
                scraping: 1,
                ..StatusSummary::default()
            },
            ..PollerViewModel::default()
        };
        let badges = vec![
            (
                ".website-status-a".to_string(),
                InMemoryBadge::new(&["badge", "bg-success"], "Completed"),
            ),
            (".website-status-b".to_string(), InMemoryBadge::new(&["badge"], "Pending")),
        ];

        let lines = render_board(now, &view, &badges);

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Status board @ 2024-05-01 10:30:00 UTC | Polling"));
        assert!(lines[0].contains("3 issued, 2 applied, 1 failed"));
        assert_eq!(
            lines[1],
            "Websites: 2 total, 1 completed, 1 scraping, 0 failed, 0 other"
        );
        assert!(lines[2].contains("[bg-success  ] Completed"));
        assert!(lines[3].contains("[-           ] Pending"));
    }

    #[test]
    fn unknown_classes_do_not_count_as_status() {
        let badge = InMemoryBadge::new(&["badge", "bg-warning", "bg-danger"], "Failed");
        assert_eq!(status_class(&badge), "bg-danger");
        assert_eq!(status_class(&InMemoryBadge::new(&["bg-warning"], "x")), "-");
    }
}
