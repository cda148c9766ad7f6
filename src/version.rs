//! Release naming. Each major version is named after a mindful-technology
//! thinker, in alphabetical order.

/// (codename, full name, work) per major version, starting at 1.
const THINKERS: [(&str, &str, &str); 22] = [
    ("allen", "David Allen", "Getting Things Done"),
    ("burkeman", "Oliver Burkeman", "Four Thousand Weeks"),
    ("csikszentmihalyi", "Mihaly Csikszentmihalyi", "Flow"),
    ("duckworth", "Angela Duckworth", "Grit"),
    ("ericsson", "Anders Ericsson", "Peak"),
    ("ferriss", "Tim Ferriss", "The 4-Hour Workweek"),
    ("grant", "Adam Grant", "Think Again"),
    ("haidt", "Jonathan Haidt", "The Anxious Generation"),
    ("johnson", "Steven Johnson", "Where Good Ideas Come From"),
    ("kahneman", "Daniel Kahneman", "Thinking, Fast and Slow"),
    ("lanier", "Jaron Lanier", "Ten Arguments for Deleting Your Social Media"),
    ("mckeown", "Greg McKeown", "Essentialism"),
    ("newport", "Cal Newport", "Deep Work"),
    ("odell", "Jenny Odell", "How to Do Nothing"),
    ("pink", "Daniel Pink", "Drive"),
    ("robinson", "Ken Robinson", "The Element"),
    ("sinek", "Simon Sinek", "Start with Why"),
    ("turkle", "Sherry Turkle", "Alone Together"),
    ("vanderkam", "Laura Vanderkam", "168 Hours"),
    ("williams", "James Williams", "Stand Out of Our Light"),
    ("suzuki", "Shunryu Suzuki", "Zen Mind, Beginner's Mind"),
    ("zomorodi", "Manoush Zomorodi", "Bored and Brilliant"),
];

fn thinker(major: u64) -> Option<(&'static str, &'static str, &'static str)> {
    let index = usize::try_from(major.checked_sub(1)?).ok()?;
    THINKERS.get(index).copied()
}

/// `1.0.0-allen`, or the bare semver when the major has no name.
pub fn full(semver: &str, major: u64) -> String {
    match thinker(major) {
        Some((codename, _, _)) => format!("{semver}-{codename}"),
        None => semver.to_string(),
    }
}

/// `1.0.0 "David Allen" (Getting Things Done)`.
pub fn display_name(semver: &str, major: u64) -> String {
    match thinker(major) {
        Some((_, name, work)) => format!("{semver} \"{name}\" ({work})"),
        None => semver.to_string(),
    }
}

fn current_major() -> u64 {
    env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0)
}

/// Version line for this build.
pub fn current() -> String {
    display_name(env!("CARGO_PKG_VERSION"), current_major())
}

/// Release tag for this build, e.g. `1.0.0-allen`.
pub fn current_tag() -> String {
    full(env!("CARGO_PKG_VERSION"), current_major())
}
