//! Feature extraction from masked resume text.
//!
//! Heuristic and line-oriented. Anything it cannot find is left empty; the scorers
//! degrade to neutral values on their own.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::parsing::pii::{EMAIL_TOKEN, PHONE_TOKEN};
use crate::scoring::features::{DegreeLevel, EducationEntry, ResumeFeatures, WorkEntry};
use crate::scoring::normalize::{canonical_section, meaningful_tokens};
use crate::scoring::ontology::SkillOntology;

/// Stated experience above this is treated as a typo.
const MAX_PLAUSIBLE_YEARS: f64 = 50.0;
/// Headings are short lines.
const MAX_HEADING_WORDS: usize = 4;

static RE_YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2}(?:\.\d)?)\+?\s*(?:years?|yrs?)\b").unwrap());

static RE_MONTHS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,3})\+?\s*(?:months?|mos?)\b").unwrap());

static RE_DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        (?:\b(?P<sm>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+|(?P<smn>\d{1,2})/)?
        (?P<sy>(?:19|20)\d{2})
        \s*(?:-|\x{2013}|\x{2014}|to|until)\s*
        (?:
            (?:\b(?P<em>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+|(?P<emn>\d{1,2})/)?
            (?P<ey>(?:19|20)\d{2})
            |
            (?P<present>present|current|now|today)
        )\b",
    )
    .unwrap()
});

static RE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static RE_FIELD_IN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bin\s+([A-Z][A-Za-z&]*(?:\s+(?:[A-Z][A-Za-z&]*|and|of))*)").unwrap());

static RE_FIELD_OF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bof\s+([A-Z][A-Za-z&]*(?:\s+(?:[A-Z][A-Za-z&]*|and))*)").unwrap());

const INSTITUTION_WORDS: &[&str] = &["university", "college", "institute", "school", "academy"];

/// Extracts structured features from PII-masked, cleaned text.
/// `as_of` closes open-ended ("present") roles when computing experience.
pub fn extract_features(masked_text: &str, ontology: &SkillOntology, as_of: NaiveDate) -> ResumeFeatures {
    let lines: Vec<&str> = masked_text.lines().map(str::trim).collect();

    let mut sections = BTreeSet::new();
    if masked_text.contains(EMAIL_TOKEN) || masked_text.contains(PHONE_TOKEN) {
        sections.insert("contact".to_string());
    }

    let mut education = Vec::new();
    let mut work_history = Vec::new();
    let mut current_section: Option<&'static str> = None;
    let mut previous_line: Option<&str> = None;

    for line in &lines {
        if line.is_empty() {
            continue;
        }
        if let Some(section) = heading_section(line) {
            sections.insert(section.to_string());
            current_section = Some(section);
            previous_line = None;
            continue;
        }

        let in_education = current_section == Some("education");
        let degree = DegreeLevel::classify(line);
        let education_line = degree != DegreeLevel::None
            && (in_education || current_section.is_none() || !RE_DATE_RANGE.is_match(line));

        if education_line {
            education.push(education_entry(line));
        } else if in_education {
            attach_institution(&mut education, line);
        } else if let Some(entry) = work_entry(line, previous_line) {
            work_history.push(entry);
        }
        previous_line = Some(line);
    }

    let experience_years = stated_experience(masked_text)
        .unwrap_or_else(|| history_years(&work_history, as_of));

    let mut keyword_counts: BTreeMap<String, u32> = BTreeMap::new();
    for token in meaningful_tokens(masked_text) {
        *keyword_counts.entry(token).or_insert(0) += 1;
    }

    ResumeFeatures {
        skills: ontology.find_skills(masked_text),
        experience_years,
        education,
        work_history,
        sections,
        keyword_counts,
        text: masked_text.to_string(),
    }
}

fn heading_section(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_matches(|c: char| !c.is_alphanumeric() && c != ' ');
    if trimmed.split_whitespace().count() > MAX_HEADING_WORDS {
        return None;
    }
    canonical_section(trimmed)
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Largest explicit "N years" mention, else "N months" converted to years.
fn stated_experience(text: &str) -> Option<f64> {
    let years = RE_YEARS
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .filter(|y| *y > 0.0 && *y <= MAX_PLAUSIBLE_YEARS)
        .fold(None, |max: Option<f64>, y| Some(max.map_or(y, |m| m.max(y))));
    if years.is_some() {
        return years;
    }
    RE_MONTHS
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .filter(|m| *m > 0.0)
        .fold(None, |max: Option<f64>, m| Some(max.map_or(m, |x| x.max(m))))
        .map(|months| (months / 12.0).min(MAX_PLAUSIBLE_YEARS))
}

/// Length of the union of all well-formed work ranges, in years.
fn history_years(history: &[WorkEntry], as_of: NaiveDate) -> f64 {
    let mut ranges: Vec<(i32, i32)> = history
        .iter()
        .filter_map(|w| {
            let start = month_index(w.start?);
            let end = month_index(w.end.unwrap_or(as_of));
            (end >= start).then_some((start, end))
        })
        .collect();
    ranges.sort_unstable();

    let mut total = 0;
    let mut current: Option<(i32, i32)> = None;
    for (start, end) in ranges {
        match current {
            Some((cs, ce)) if start <= ce => current = Some((cs, ce.max(end))),
            Some((cs, ce)) => {
                total += ce - cs;
                current = Some((start, end));
            }
            None => current = Some((start, end)),
        }
    }
    if let Some((cs, ce)) = current {
        total += ce - cs;
    }
    f64::from(total) / 12.0
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

// ────────────────────────────────────────────────────────────────────────────
// Work history
// ────────────────────────────────────────────────────────────────────────────

fn month_number(caps: &Captures, name: &str, numeric: &str) -> u32 {
    if let Some(m) = caps.name(name) {
        const MONTHS: [&str; 12] = [
            "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
        ];
        let lower = m.as_str().to_ascii_lowercase();
        return MONTHS.iter().position(|x| *x == lower).map_or(1, |i| i as u32 + 1);
    }
    caps.name(numeric)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|m| (1..=12).contains(m))
        .unwrap_or(1)
}

fn year_month(caps: &Captures, year: &str, month: &str, numeric: &str) -> Option<NaiveDate> {
    let y = caps.name(year)?.as_str().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(y, month_number(caps, month, numeric), 1)
}

/// A line holding a date range becomes a work entry. Title and company come from the
/// rest of the line, or from the line above when the range stands alone.
fn work_entry(line: &str, previous_line: Option<&str>) -> Option<WorkEntry> {
    let caps = RE_DATE_RANGE.captures(line)?;
    let range = caps.get(0)?;

    let start = year_month(&caps, "sy", "sm", "smn");
    let end = if caps.name("present").is_some() {
        None
    } else {
        year_month(&caps, "ey", "em", "emn")
    };

    let rest = format!("{} {}", &line[..range.start()], &line[range.end()..]);
    let rest = rest.trim_matches(|c: char| c.is_whitespace() || "|,-()@\u{2013}\u{2014}".contains(c));
    let context = if rest.is_empty() {
        previous_line.unwrap_or_default()
    } else {
        rest
    };

    let (title, company) = split_title_company(context);
    Some(WorkEntry {
        title,
        company,
        start,
        end,
    })
}

fn split_title_company(context: &str) -> (String, Option<String>) {
    for separator in [" at ", " @ ", " | ", ", ", " - "] {
        if let Some((title, company)) = context.split_once(separator) {
            let company = company.trim();
            return (
                title.trim().to_string(),
                (!company.is_empty()).then(|| company.to_string()),
            );
        }
    }
    (context.trim().to_string(), None)
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

fn education_entry(line: &str) -> EducationEntry {
    let field = RE_FIELD_IN
        .captures(line)
        .or_else(|| RE_FIELD_OF.captures(line))
        .map(|c| c[1].trim().to_string())
        .filter(|f| !f.is_empty());

    EducationEntry {
        degree: line.to_string(),
        field,
        institution: institution_in(line),
        end_year: RE_YEAR
            .find_iter(line)
            .last()
            .and_then(|m| m.as_str().parse().ok()),
    }
}

fn institution_in(line: &str) -> Option<String> {
    line.split(|c| matches!(c, ',' | '|' | ';'))
        .map(str::trim)
        .find(|part| {
            let lower = part.to_lowercase();
            INSTITUTION_WORDS.iter().any(|w| lower.contains(w))
        })
        .map(|part| RE_YEAR.replace_all(part, "").trim_matches([' ', '-']).to_string())
}

/// Inside an education section, a non-degree line naming an institution belongs to the
/// entry above it.
fn attach_institution(education: &mut [EducationEntry], line: &str) {
    let Some(last) = education.last_mut() else {
        return;
    };
    if last.institution.is_none() {
        last.institution = institution_in(line);
    }
    if last.end_year.is_none() {
        last.end_year = RE_YEAR.find_iter(line).last().and_then(|m| m.as_str().parse().ok());
    }
}
