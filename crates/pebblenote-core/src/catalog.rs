//! Consumer catalog and admin insights.

use serde::Serialize;

use crate::models::{Note, NoteDraft, Purchase, PurchaseStatus};

/// Category label shown for listings without one.
pub const FALLBACK_LISTING_CATEGORY: &str = "Notes";

/// A note as shown to buyers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub price_label: String,
    pub category: String,
    pub description: String,
    pub preview: Option<String>,
}

impl From<&Note> for Listing {
    fn from(note: &Note) -> Self {
        let category = if note.category.trim().is_empty() {
            FALLBACK_LISTING_CATEGORY.to_string()
        } else {
            note.category.clone()
        };

        Self {
            id: note.id.get(),
            title: note.title.clone(),
            price: note.price,
            price_label: format_price(note.price),
            category,
            description: note.description.clone(),
            preview: note.cover_preview().map(ToString::to_string),
        }
    }
}

/// Listings visible to non-admin consumers: enabled notes, by id.
pub fn visible_listings(notes: &[Note]) -> Vec<Listing> {
    let mut visible = notes.iter().filter(|note| note.enabled).collect::<Vec<_>>();
    visible.sort_by_key(|note| note.id);
    visible.into_iter().map(Listing::from).collect()
}

/// Format a price in rupees with two decimals.
pub fn format_price(price: f64) -> String {
    format!("Rs {price:.2}")
}

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Insights {
    pub total_notes: usize,
    pub enabled_notes: usize,
    pub disabled_notes: usize,
    pub total_sales: usize,
    pub revenue: f64,
}

impl Insights {
    pub fn collect(notes: &[Note], purchases: &[Purchase]) -> Self {
        let enabled_notes = notes.iter().filter(|note| note.enabled).count();
        let successful = purchases
            .iter()
            .filter(|purchase| purchase.status == PurchaseStatus::Success);

        let (total_sales, revenue) = successful.fold((0_usize, 0.0_f64), |(count, sum), purchase| {
            (count + 1, sum + purchase.price)
        });

        Self {
            total_notes: notes.len(),
            enabled_notes,
            disabled_notes: notes.len() - enabled_notes,
            total_sales,
            revenue,
        }
    }
}

/// Listings a fresh demo install starts with.
pub fn demo_drafts() -> Vec<NoteDraft> {
    vec![
        NoteDraft::new("Ghumgham", 3.0),
        NoteDraft::new("fun", 33.0),
        NoteDraft::new("photo", 2.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteId, PaymentMethod};
    use pretty_assertions::assert_eq;

    fn note(id: u64, title: &str, enabled: bool) -> Note {
        let draft = NoteDraft::new(title, 5.5);
        let draft = if enabled { draft } else { draft.disabled() };
        Note::from_draft(NoteId::new(id), draft)
    }

    fn purchase(price: f64, status: PurchaseStatus) -> Purchase {
        Purchase {
            note_id: NoteId::new(1),
            title: "Math Notes".into(),
            price,
            method: PaymentMethod::Khalti,
            status,
            timestamp: 0,
        }
    }

    #[test]
    fn visible_listings_hide_disabled_and_sort() {
        let notes = vec![note(3, "c", true), note(1, "a", true), note(2, "b", false)];
        let ids = visible_listings(&notes)
            .iter()
            .map(|listing| listing.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn listing_formats_price_and_category() {
        let mut source = note(1, "Math Notes", true);
        source.category = "  ".into();
        source.preview_refs = vec!["content://cover".into(), "content://2".into()];

        let listing = Listing::from(&source);
        assert_eq!(listing.price_label, "Rs 5.50");
        assert_eq!(listing.category, "Notes");
        assert_eq!(listing.preview.as_deref(), Some("content://cover"));
    }

    #[test]
    fn format_price_rounds_to_two_places() {
        assert_eq!(format_price(0.0), "Rs 0.00");
        assert_eq!(format_price(33.0), "Rs 33.00");
        assert_eq!(format_price(2.499), "Rs 2.50");
    }

    #[test]
    fn insights_count_notes_and_successful_sales() {
        let notes = vec![note(1, "a", true), note(2, "b", false), note(3, "c", true)];
        let purchases = vec![
            purchase(5.5, PurchaseStatus::Success),
            purchase(2.0, PurchaseStatus::Success),
            purchase(9.0, PurchaseStatus::Failed),
        ];

        let insights = Insights::collect(&notes, &purchases);
        assert_eq!(insights.total_notes, 3);
        assert_eq!(insights.enabled_notes, 2);
        assert_eq!(insights.disabled_notes, 1);
        assert_eq!(insights.total_sales, 2);
        assert!((insights.revenue - 7.5).abs() < 1e-9);
    }

    #[test]
    fn demo_drafts_are_valid() {
        let drafts = demo_drafts();
        assert_eq!(drafts.len(), 3);
        assert!(drafts.iter().all(|draft| draft.validate().is_ok()));
    }
}
