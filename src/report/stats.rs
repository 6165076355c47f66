use crate::input::DeletionItem;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// `bytes` in base-1024 units with two decimals, e.g. `1.50 GB`.
pub fn human_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// One line of the deletion log, as rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct DeletionRow {
    pub path: String,
    pub category: String,
    pub size: u64,
    pub succeeded: bool,
    pub method: String,
}

impl DeletionRow {
    pub fn from_item(item: &DeletionItem) -> Self {
        let succeeded = item.succeeded();
        let method = if succeeded {
            "Delete".to_string()
        } else {
            let reason = item.error.as_deref().filter(|e| !e.is_empty()).unwrap_or("error");
            format!("Failed ({reason})")
        };
        DeletionRow {
            path: item.display_path().to_string(),
            category: item
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "File".to_string()),
            size: item.size,
            succeeded,
            method,
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.path.clone(),
            self.category.clone(),
            human_bytes(self.size),
            self.method.clone(),
        ]
    }

    fn is_sensitive(&self) -> bool {
        let category = self.category.to_lowercase();
        category.contains("personal") || category.contains("sensitive")
    }
}

/// Totals shown on the summary page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeletionSummary {
    pub deleted: usize,
    pub bytes_deleted: u64,
    pub failed: usize,
    pub sensitive: usize,
}

impl DeletionSummary {
    pub fn from_rows(rows: &[DeletionRow]) -> Self {
        rows.iter().fold(DeletionSummary::default(), |mut acc, row| {
            if row.succeeded {
                acc.deleted += 1;
                acc.bytes_deleted = acc.bytes_deleted.saturating_add(row.size);
                if row.is_sensitive() {
                    acc.sensitive += 1;
                }
            } else {
                acc.failed += 1;
            }
            acc
        })
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.deleted.to_string(),
            human_bytes(self.bytes_deleted),
            self.failed.to_string(),
            self.sensitive.to_string(),
        ]
    }
}
