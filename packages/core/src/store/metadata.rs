//! Metadata Store
//!
//! Per-researcher attributes merged field by field from independent tables.
//! Rosters own faculty and department, the research-center table owns the
//! center, and the topic table owns focus topics. A later source only
//! overwrites the fields it defines.

use crate::models::{
    FacultyData, ResearcherId, ResearcherInfo, ResearcherRecord, UNKNOWN_CENTER,
    UNKNOWN_DEPARTMENT, UNKNOWN_FACULTY,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One roster row. Empty cells are `None` and leave existing values alone.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    pub name: ResearcherId,
    pub faculty: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CenterRow {
    pub name: ResearcherId,
    pub research_center: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicRow {
    pub name: ResearcherId,
    pub topic: String,
    pub weight: f64,
}

/// Merged attributes for one researcher; `None` fields resolve to sentinels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataEntry {
    pub faculty: Option<String>,
    pub department: Option<String>,
    pub research_center: Option<String>,
    pub focus_topics: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    entries: HashMap<ResearcherId, MetadataEntry>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, name: ResearcherId) -> &mut MetadataEntry {
        self.entries.entry(name).or_default()
    }

    /// Merge roster rows. Returns the number of rows applied.
    pub fn apply_roster(&mut self, rows: impl IntoIterator<Item = RosterRow>) -> usize {
        let mut applied = 0;
        for row in rows {
            let entry = self.entry(row.name);
            if let Some(faculty) = row.faculty {
                entry.faculty = Some(faculty);
            }
            if let Some(department) = row.department {
                entry.department = Some(department);
            }
            applied += 1;
        }
        applied
    }

    pub fn apply_research_centers(&mut self, rows: impl IntoIterator<Item = CenterRow>) -> usize {
        let mut applied = 0;
        for row in rows {
            self.entry(row.name).research_center = Some(row.research_center);
            applied += 1;
        }
        applied
    }

    /// Replace focus topics for every researcher in `rows` with their top `n`
    /// topics by weight. Returns the number of researchers updated.
    pub fn apply_topics(&mut self, rows: impl IntoIterator<Item = TopicRow>, n: usize) -> usize {
        let mut grouped: HashMap<ResearcherId, Vec<(String, f64)>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.name)
                .or_default()
                .push((row.topic, row.weight));
        }

        let updated = grouped.len();
        for (name, weighted) in grouped {
            self.entry(name).focus_topics = top_topics(&weighted, n);
        }
        updated
    }

    /// Number of researchers with any metadata
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MetadataEntry> {
        self.entries.get(name.trim())
    }

    /// Joined record for `name`, with sentinels for anything unknown
    pub fn record(&self, name: &str) -> ResearcherRecord {
        let id = ResearcherId::new(name);
        let Some(entry) = self.entries.get(&id) else {
            return ResearcherRecord::unknown(id);
        };

        ResearcherRecord {
            name: id,
            faculty: entry
                .faculty
                .clone()
                .unwrap_or_else(|| UNKNOWN_FACULTY.to_string()),
            department: entry
                .department
                .clone()
                .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string()),
            research_center: entry
                .research_center
                .clone()
                .unwrap_or_else(|| UNKNOWN_CENTER.to_string()),
            focus_topics: entry.focus_topics.clone(),
        }
    }

    /// Known faculty names, sorted and unique
    pub fn faculties(&self) -> Vec<String> {
        self.entries
            .values()
            .filter_map(|entry| entry.faculty.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Researchers of one faculty grouped by department, names in order.
    /// `None` when no researcher belongs to `faculty`.
    pub fn faculty_data(&self, faculty: &str) -> Option<FacultyData> {
        let faculty = faculty.trim();
        let mut members: Vec<(&ResearcherId, &MetadataEntry)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.faculty.as_deref() == Some(faculty))
            .collect();
        if members.is_empty() {
            return None;
        }
        members.sort_by(|a, b| a.0.cmp(b.0));

        let mut departments: BTreeMap<String, Vec<ResearcherInfo>> = BTreeMap::new();
        for (name, entry) in members {
            let department = entry
                .department
                .clone()
                .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string());
            departments.entry(department).or_default().push(ResearcherInfo {
                name: name.clone(),
                research_center: entry
                    .research_center
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CENTER.to_string()),
                focus_topics: entry.focus_topics.clone(),
            });
        }

        Some(FacultyData {
            faculty: faculty.to_string(),
            departments,
        })
    }
}

/// Top `n` topics by weight, highest first. Equal weights keep row order.
pub fn top_topics(weighted: &[(String, f64)], n: usize) -> Vec<String> {
    let mut sorted: Vec<&(String, f64)> = weighted.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    sorted
        .into_iter()
        .take(n)
        .map(|(topic, _)| topic.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(name: &str, faculty: Option<&str>, department: Option<&str>) -> RosterRow {
        RosterRow {
            name: ResearcherId::new(name),
            faculty: faculty.map(String::from),
            department: department.map(String::from),
        }
    }

    fn topic(name: &str, topic: &str, weight: f64) -> TopicRow {
        TopicRow {
            name: ResearcherId::new(name),
            topic: topic.to_string(),
            weight,
        }
    }

    #[test]
    fn test_top_topics() {
        let weighted: Vec<(String, f64)> = [("A", 0.4), ("B", 0.3), ("C", 0.2), ("D", 0.06), ("E", 0.04)]
            .iter()
            .map(|(t, w)| (t.to_string(), *w))
            .collect();
        assert_eq!(top_topics(&weighted, 4), vec!["A", "B", "C", "D"]);

        let shuffled: Vec<(String, f64)> = [("E", 0.04), ("C", 0.2), ("A", 0.4), ("D", 0.06), ("B", 0.3)]
            .iter()
            .map(|(t, w)| (t.to_string(), *w))
            .collect();
        assert_eq!(top_topics(&shuffled, 4), vec!["A", "B", "C", "D"]);
        assert_eq!(top_topics(&shuffled, 10).len(), 5);
    }

    #[test]
    fn test_top_topics_ties_keep_row_order() {
        let weighted = vec![
            ("X".to_string(), 0.5),
            ("Y".to_string(), 0.5),
            ("Z".to_string(), 0.9),
        ];
        assert_eq!(top_topics(&weighted, 3), vec!["Z", "X", "Y"]);
    }

    #[test]
    fn test_fields_merge_per_source() {
        let mut store = MetadataStore::new();
        store.apply_research_centers(vec![CenterRow {
            name: ResearcherId::new("Alice"),
            research_center: "AI Center".to_string(),
        }]);
        store.apply_roster(vec![roster(" Alice", Some("Science"), Some("Physics"))]);
        store.apply_roster(vec![roster("Alice ", None, Some("Computer Science"))]);
        store.apply_topics(vec![topic("Alice", "NLP", 0.7)], 4);

        let record = store.record("  Alice  ");
        assert_eq!(record.faculty, "Science");
        assert_eq!(record.department, "Computer Science");
        assert_eq!(record.research_center, "AI Center");
        assert_eq!(record.focus_topics, vec!["NLP"]);
    }

    #[test]
    fn test_record_sentinels() {
        let mut store = MetadataStore::new();
        store.apply_topics(vec![topic("Bob", "Robotics", 1.0)], 4);

        let partial = store.record("Bob");
        assert_eq!(partial.faculty, UNKNOWN_FACULTY);
        assert_eq!(partial.research_center, UNKNOWN_CENTER);
        assert_eq!(partial.focus_topics, vec!["Robotics"]);

        let missing = store.record("Nobody");
        assert_eq!(missing, ResearcherRecord::unknown(ResearcherId::new("Nobody")));
    }

    #[test]
    fn test_faculty_directory() {
        let mut store = MetadataStore::new();
        store.apply_roster(vec![
            roster("Zed", Some("Engineering"), Some("Electrical")),
            roster("Amy", Some("Engineering"), Some("Electrical")),
            roster("Kim", Some("Engineering"), None),
            roster("Lee", Some("Science"), Some("Physics")),
            roster("Ann", None, Some("Biology")),
        ]);

        assert_eq!(store.faculties(), vec!["Engineering", "Science"]);

        let data = store.faculty_data("Engineering").unwrap();
        assert_eq!(data.faculty, "Engineering");
        let electrical: Vec<&str> = data.departments["Electrical"]
            .iter()
            .map(|info| info.name.as_str())
            .collect();
        assert_eq!(electrical, vec!["Amy", "Zed"]);
        assert_eq!(data.departments[UNKNOWN_DEPARTMENT].len(), 1);
        assert_eq!(
            data.departments["Electrical"][0].research_center,
            UNKNOWN_CENTER
        );

        assert!(store.faculty_data("Medicine").is_none());
    }
}
