use chrono::{DateTime, Duration, TimeZone, Utc};
use kinship::health::{
    refresh_health_scores, status_from_score, CircleMembership, ContactId, HealthStatus,
    StatusBreakdown, Tier, UserId,
};

fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 6, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn contact(id: &str) -> ContactId {
    ContactId::parse(id).expect("valid contact id")
}

#[test]
fn fortnightly_contact_cools_week_by_week() {
    let user = UserId::parse("user-7").expect("valid user id");
    let memberships = vec![CircleMembership::new(contact("grace"), Tier(2))];
    let start = monday();

    let baseline = refresh_health_scores(&user, &memberships, &[], start);
    assert_eq!(baseline.len(), 1);
    assert_eq!(baseline[0].health_score, 100);
    assert_eq!(baseline[0].last_contact_at, Some(start));

    let mut stored = baseline;
    let mut observed = Vec::new();
    for week in 1..=3 {
        let now = start + Duration::weeks(week);
        stored = refresh_health_scores(&user, &memberships, &stored, now);
        observed.push((stored[0].health_score, stored[0].status));
    }

    assert_eq!(
        observed,
        vec![
            (75, HealthStatus::Cooling),
            (50, HealthStatus::AtRisk),
            (25, HealthStatus::Cold),
        ]
    );
    assert_eq!(stored[0].days_since_contact, 21);
    assert_eq!(stored[0].last_contact_at, Some(start));
}

#[test]
fn closer_tiers_decay_faster() {
    let user = UserId::parse("user-7").expect("valid user id");
    let memberships = vec![
        CircleMembership::new(contact("ada"), Tier(1)),
        CircleMembership::new(contact("alan"), Tier(5)),
        CircleMembership::new(contact("edsger"), Tier(9)),
    ];
    let start = monday();
    let baseline = refresh_health_scores(&user, &memberships, &[], start);

    let later = refresh_health_scores(&user, &memberships, &baseline, start + Duration::days(7));
    let scores: Vec<(&str, u8)> = later
        .iter()
        .map(|record| (record.contact_id.as_str(), record.health_score))
        .collect();

    // 7-day cadence halves in a week; 45 and 30 (unknown tier) barely move.
    assert_eq!(scores, vec![("ada", 50), ("alan", 92), ("edsger", 88)]);

    let breakdown = StatusBreakdown::from_records(&later);
    assert_eq!(breakdown.count(HealthStatus::AtRisk), 1);
    assert_eq!(breakdown.count(HealthStatus::Healthy), 2);
    assert_eq!(breakdown.total(), 3);
}

#[test]
fn status_bands_cover_the_whole_range() {
    for score in 0..=100u8 {
        let status = status_from_score(score);
        let expected = match score {
            80..=100 => HealthStatus::Healthy,
            60..=79 => HealthStatus::Cooling,
            40..=59 => HealthStatus::AtRisk,
            _ => HealthStatus::Cold,
        };
        assert_eq!(status, expected, "score {score}");
    }
}
