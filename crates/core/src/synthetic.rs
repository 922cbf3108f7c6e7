//! Synthetic meeting data and summaries.
//!
//! Served whenever the provider cascade is exhausted or the LLM is
//! unavailable, so the surface always has something to show. Generation is
//! deterministic given the meeting and the anchor time.

use chrono::{DateTime, Duration, Timelike, Utc};

use meetsync_domain::{Attendee, Meeting, MeetingKind, Organizer};

/// Sample meeting list anchored to `now`: five meetings spread across the
/// next (or previous) five days.
pub fn sample_meetings(kind: MeetingKind, now: DateTime<Utc>) -> Vec<Meeting> {
    match kind {
        MeetingKind::Upcoming => upcoming_samples(now),
        MeetingKind::Past => past_samples(now),
    }
}

/// Summary text derived from meeting metadata alone.
pub fn sample_summary(meeting: &Meeting) -> String {
    let duration = format_duration(meeting.start, meeting.end);
    let day_of_week = meeting.start.format("%A");
    let tod = time_of_day(meeting.start);
    let kind = meeting_type(&meeting.title);

    let mut summary = format!(
        "This {duration} {kind} titled \"{}\" took place on {day_of_week} {tod}. ",
        meeting.title
    );

    let attendee_count = meeting.attendees.len();
    if attendee_count > 0 {
        let plural = if attendee_count > 1 { "s" } else { "" };
        summary.push_str(&format!("With {attendee_count} participant{plural} in attendance, "));
    }

    if !meeting.meet_link.is_empty() {
        summary.push_str("the meeting was conducted virtually via Google Meet. ");
    } else if !meeting.location.is_empty() {
        summary.push_str(&format!("the meeting was held at {}. ", meeting.location));
    }

    if meeting.description.len() > 20 {
        let preview: String = meeting.description.chars().take(100).collect();
        let ellipsis = if meeting.description.chars().count() > 100 { "..." } else { "" };
        summary.push_str(&format!("The agenda included: {preview}{ellipsis}"));
    } else {
        summary.push_str(match kind {
            "team standup" => {
                "The team likely discussed daily progress, blockers, and upcoming priorities."
            }
            "one-on-one" => {
                "This session provided an opportunity for individual feedback, career \
                 development, and personal check-in."
            }
            "review session" => {
                "The team reviewed recent work, gathered feedback, and identified areas for \
                 improvement."
            }
            "planning session" => {
                "Participants collaborated on upcoming objectives, resource allocation, and \
                 timeline planning."
            }
            _ => "This session facilitated collaboration and alignment among team members.",
        });
    }

    summary
}

/// Meeting type inferred from keywords in the title.
pub fn meeting_type(title: &str) -> &'static str {
    let title = title.to_lowercase();
    if title.contains("standup") || title.contains("stand-up") || title.contains("daily") {
        "team standup"
    } else if title.contains("1:1") || title.contains("one-on-one") || title.contains("1-on-1") {
        "one-on-one"
    } else if title.contains("review") || title.contains("retro") {
        "review session"
    } else if title.contains("planning") || title.contains("sprint") {
        "planning session"
    } else if title.contains("interview") {
        "interview"
    } else if title.contains("demo") || title.contains("presentation") {
        "presentation or demo"
    } else {
        "general discussion"
    }
}

/// Human-readable duration: `45 minutes`, `1h 30m`, or `2 hours`.
pub fn format_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let mins = (end - start).num_minutes().max(0);
    if mins < 60 {
        return format!("{mins} minutes");
    }
    let hours = mins / 60;
    let rem = mins % 60;
    if rem > 0 {
        format!("{hours}h {rem}m")
    } else {
        format!("{hours} hour{}", if hours > 1 { "s" } else { "" })
    }
}

/// Coarse time-of-day bucket from the start hour.
pub fn time_of_day(start: DateTime<Utc>) -> &'static str {
    match start.hour() {
        0..=11 => "morning",
        12..=16 => "afternoon",
        _ => "evening",
    }
}

fn attendee(email: &str, name: &str, status: &str) -> Attendee {
    Attendee { email: email.into(), name: name.into(), response_status: Some(status.into()) }
}

fn organizer(email: &str, name: &str) -> Organizer {
    Organizer { email: email.into(), name: Some(name.into()) }
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    title: &str,
    start: DateTime<Utc>,
    minutes: i64,
    description: &str,
    attendees: Vec<Attendee>,
    location: &str,
    meet_link: &str,
    org: Organizer,
) -> Meeting {
    Meeting {
        id: id.into(),
        title: title.into(),
        start,
        end: start + Duration::minutes(minutes),
        description: description.into(),
        attendees,
        location: location.into(),
        meet_link: meet_link.into(),
        organizer: Some(org),
    }
}

fn upcoming_samples(now: DateTime<Utc>) -> Vec<Meeting> {
    vec![
        sample(
            "sample-1",
            "Team Standup",
            now + Duration::hours(2),
            30,
            "Daily team synchronization meeting",
            vec![
                attendee("john@example.com", "John Doe", "accepted"),
                attendee("jane@example.com", "Jane Smith", "accepted"),
            ],
            "Conference Room A",
            "https://meet.google.com/sample-1",
            organizer("john@example.com", "John Doe"),
        ),
        sample(
            "sample-2",
            "Product Planning Session",
            now + Duration::hours(24),
            60,
            "Q1 2025 product roadmap planning",
            vec![
                attendee("sarah@example.com", "Sarah Johnson", "accepted"),
                attendee("mike@example.com", "Mike Wilson", "tentative"),
            ],
            "Zoom",
            "https://zoom.us/sample-2",
            organizer("sarah@example.com", "Sarah Johnson"),
        ),
        sample(
            "sample-3",
            "Client Demo",
            now + Duration::hours(48),
            60,
            "Showcase new features to the client",
            vec![attendee("client@example.com", "Client Representative", "accepted")],
            "Virtual",
            "https://meet.google.com/sample-3",
            organizer("you@example.com", "You"),
        ),
        sample(
            "sample-4",
            "Engineering Review",
            now + Duration::hours(72),
            60,
            "Code review and architecture discussion",
            vec![
                attendee("tech-lead@example.com", "Tech Lead", "accepted"),
                attendee("engineer1@example.com", "Engineer 1", "accepted"),
                attendee("engineer2@example.com", "Engineer 2", "accepted"),
            ],
            "Conference Room B",
            "https://meet.google.com/sample-4",
            organizer("tech-lead@example.com", "Tech Lead"),
        ),
        sample(
            "sample-5",
            "Sprint Retrospective",
            now + Duration::hours(120),
            90,
            "Review the past sprint and plan improvements",
            vec![
                attendee("scrum-master@example.com", "Scrum Master", "accepted"),
                attendee("team@example.com", "Team", "accepted"),
            ],
            "Virtual",
            "https://meet.google.com/sample-5",
            organizer("scrum-master@example.com", "Scrum Master"),
        ),
    ]
}

fn past_samples(now: DateTime<Utc>) -> Vec<Meeting> {
    vec![
        sample(
            "sample-past-1",
            "Weekly Sync",
            now - Duration::hours(2),
            30,
            "Weekly team synchronization meeting",
            vec![
                attendee("alice@example.com", "Alice Brown", "accepted"),
                attendee("bob@example.com", "Bob Green", "accepted"),
            ],
            "Conference Room A",
            "https://meet.google.com/sample-past-1",
            organizer("alice@example.com", "Alice Brown"),
        ),
        sample(
            "sample-past-2",
            "Design Review",
            now - Duration::hours(24),
            60,
            "Review UI/UX designs for the new feature",
            vec![
                attendee("designer@example.com", "Design Team", "accepted"),
                attendee("pm@example.com", "Product Manager", "accepted"),
            ],
            "Zoom",
            "https://zoom.us/sample-past-2",
            organizer("designer@example.com", "Design Team"),
        ),
        sample(
            "sample-past-3",
            "Sprint Planning",
            now - Duration::hours(48),
            120,
            "Plan tasks and goals for the upcoming sprint",
            vec![
                attendee("team-lead@example.com", "Team Lead", "accepted"),
                attendee("dev1@example.com", "Developer 1", "accepted"),
                attendee("dev2@example.com", "Developer 2", "accepted"),
            ],
            "Conference Room B",
            "https://meet.google.com/sample-past-3",
            organizer("team-lead@example.com", "Team Lead"),
        ),
        sample(
            "sample-past-4",
            "Customer Feedback Session",
            now - Duration::hours(72),
            60,
            "Gather feedback from key customers",
            vec![
                attendee("customer1@example.com", "Customer 1", "accepted"),
                attendee("customer2@example.com", "Customer 2", "accepted"),
            ],
            "Virtual",
            "https://meet.google.com/sample-past-4",
            organizer("cs@example.com", "Customer Success"),
        ),
        sample(
            "sample-past-5",
            "Technical Architecture Discussion",
            now - Duration::hours(120),
            90,
            "Discuss system architecture and scalability",
            vec![
                attendee("architect@example.com", "System Architect", "accepted"),
                attendee("senior-dev@example.com", "Senior Developer", "accepted"),
            ],
            "Conference Room C",
            "https://meet.google.com/sample-past-5",
            organizer("architect@example.com", "System Architect"),
        ),
    ]
}
