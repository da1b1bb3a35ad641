use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Activity, Country, Deal, DealStatus, Priority, PIPELINE_STAGES, USD_TO_COP};

/// Active view filters. `None` means the "Todos" option is selected.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub search: String,
    pub country: Option<Country>,
    pub seller: Option<String>,
}

/// One chart-ready point, e.g. a pipeline stage and its accumulated value.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
}

fn matches(deal: &Deal, filters: &Filters) -> bool {
    let needle = filters.search.trim().to_lowercase();
    let search_ok = needle.is_empty()
        || deal.title.to_lowercase().contains(&needle)
        || deal.organization.to_lowercase().contains(&needle)
        || deal.contact_name.to_lowercase().contains(&needle);

    let country_ok = filters.country.map_or(true, |c| deal.country == c);
    let seller_ok = filters
        .seller
        .as_ref()
        .map_or(true, |s| &deal.seller_id == s);

    search_ok && country_ok && seller_ok
}

/// Deals passing the search term plus country/seller filters, in the
/// collection's own order.
pub fn filtered_deals<'a>(deals: &'a [Deal], filters: &Filters) -> Vec<&'a Deal> {
    deals.iter().filter(|d| matches(d, filters)).collect()
}

/// Partition of the filtered deals over every status, in pipeline order.
/// Stages with no matching deal yield an empty bucket, never a missing one.
pub fn deals_by_stage<'a>(
    deals: &'a [Deal],
    filters: &Filters,
) -> Vec<(DealStatus, Vec<&'a Deal>)> {
    let filtered = filtered_deals(deals, filters);
    DealStatus::ALL
        .iter()
        .map(|&stage| {
            let bucket: Vec<&Deal> = filtered
                .iter()
                .copied()
                .filter(|d| d.status == stage)
                .collect();
            (stage, bucket)
        })
        .collect()
}

/// Sum of the USD value over the filtered deals.
pub fn total_value(deals: &[Deal], filters: &Filters) -> f64 {
    filtered_deals(deals, filters).iter().map(|d| d.value).sum()
}

/// Accumulated deal value per active pipeline stage, in board order.
pub fn stage_value_series(deals: &[Deal], filters: &Filters) -> Vec<SeriesPoint> {
    let filtered = filtered_deals(deals, filters);
    PIPELINE_STAGES
        .iter()
        .map(|&stage| SeriesPoint {
            name: stage.as_str().to_string(),
            value: filtered
                .iter()
                .filter(|d| d.status == stage)
                .map(|d| d.value)
                .sum(),
        })
        .collect()
}

/// Deal count per priority, post-filter.
pub fn priority_count_series(deals: &[Deal], filters: &Filters) -> Vec<SeriesPoint> {
    let filtered = filtered_deals(deals, filters);
    Priority::ALL
        .iter()
        .map(|&priority| SeriesPoint {
            name: priority.as_str().to_uppercase(),
            value: filtered.iter().filter(|d| d.priority == priority).count() as f64,
        })
        .collect()
}

/// An activity tagged with the deal that owns it, for the agenda view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEntry {
    pub deal_id: String,
    pub deal_title: String,
    pub organization: String,
    pub activity: Activity,
}

/// All activities dated today or later across the whole collection,
/// earliest first. Activities whose date cannot be parsed are skipped.
pub fn upcoming_activities(deals: &[Deal], today: NaiveDate) -> Vec<AgendaEntry> {
    let mut entries: Vec<AgendaEntry> = deals
        .iter()
        .flat_map(|deal| {
            deal.activities.iter().filter_map(move |activity| {
                let date = NaiveDate::parse_from_str(&activity.date, "%Y-%m-%d").ok()?;
                (date >= today).then(|| AgendaEntry {
                    deal_id: deal.id.clone(),
                    deal_title: deal.title.clone(),
                    organization: deal.organization.clone(),
                    activity: activity.clone(),
                })
            })
        })
        .collect();
    entries.sort_by(|a, b| a.activity.date.cmp(&b.activity.date));
    entries
}

/// Everything the dashboard needs, recomputed from scratch on each call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub deals: Vec<Deal>,
    pub total_value: f64,
    pub total_value_cop: f64,
    pub stage_values: Vec<SeriesPoint>,
    pub priority_counts: Vec<SeriesPoint>,
}

pub fn snapshot(deals: &[Deal], filters: &Filters) -> ViewSnapshot {
    let total = total_value(deals, filters);
    ViewSnapshot {
        deals: filtered_deals(deals, filters)
            .into_iter()
            .cloned()
            .collect(),
        total_value: total,
        total_value_cop: total * USD_TO_COP,
        stage_values: stage_value_series(deals, filters),
        priority_counts: priority_count_series(deals, filters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed_deals;

    fn sample() -> Vec<Deal> {
        // Matches the two-deal scenario from the seed data: id "1" is a
        // Colombian Lead In worth 12k, id "2" a Mexican Contactado worth 45k.
        seed_deals()
    }

    #[test]
    fn country_filter_scenario() {
        let deals = sample();
        let filters = Filters {
            country: Some(Country::Colombia),
            ..Filters::default()
        };

        let filtered = filtered_deals(&deals, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "1");
        assert_eq!(total_value(&deals, &filters), 12000.0);
    }

    #[test]
    fn search_is_case_insensitive_over_three_fields() {
        let deals = sample();
        for term in ["olivo", "FOODIE", "lucía"] {
            let filters = Filters {
                search: term.to_string(),
                ..Filters::default()
            };
            assert_eq!(filtered_deals(&deals, &filters).len(), 1, "term {term}");
        }

        let none = Filters {
            search: "no-such-deal".to_string(),
            ..Filters::default()
        };
        assert!(filtered_deals(&deals, &none).is_empty());
    }

    #[test]
    fn seller_filter_is_exact() {
        let deals = sample();
        let filters = Filters {
            seller: Some("sel-2".to_string()),
            ..Filters::default()
        };
        let filtered = filtered_deals(&deals, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");
    }

    #[test]
    fn stage_partition_covers_filtered_deals_exactly() {
        let mut deals = sample();
        deals[1].status = DealStatus::Won;
        let filters = Filters::default();

        let filtered = filtered_deals(&deals, &filters);
        let buckets = deals_by_stage(&deals, &filters);

        assert_eq!(buckets.len(), DealStatus::ALL.len());
        let union: Vec<&str> = buckets
            .iter()
            .flat_map(|(_, bucket)| bucket.iter().map(|d| d.id.as_str()))
            .collect();
        assert_eq!(union.len(), filtered.len());
        for deal in &filtered {
            assert!(union.contains(&deal.id.as_str()));
        }
    }

    #[test]
    fn empty_stages_yield_empty_buckets() {
        let deals = sample();
        let buckets = deals_by_stage(&deals, &Filters::default());
        let negotiating = buckets
            .iter()
            .find(|(stage, _)| *stage == DealStatus::Negotiating)
            .expect("bucket present");
        assert!(negotiating.1.is_empty());
    }

    #[test]
    fn total_value_of_empty_collection_is_zero() {
        assert_eq!(total_value(&[], &Filters::default()), 0.0);
    }

    #[test]
    fn stage_series_follows_board_order() {
        let deals = sample();
        let series = stage_value_series(&deals, &Filters::default());
        assert_eq!(series.len(), PIPELINE_STAGES.len());
        assert_eq!(series[0].name, "Lead In");
        assert_eq!(series[0].value, 12000.0);
        assert_eq!(series[1].name, "Contactado");
        assert_eq!(series[1].value, 45000.0);
        assert_eq!(series[2].value, 0.0);
    }

    #[test]
    fn priority_counts_cover_all_levels() {
        let deals = sample();
        let series = priority_count_series(&deals, &Filters::default());
        let names: Vec<&str> = series.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["LOW", "MEDIUM", "HIGH"]);
        assert_eq!(series[0].value, 0.0);
        assert_eq!(series[1].value, 1.0);
        assert_eq!(series[2].value, 1.0);
    }

    #[test]
    fn upcoming_activities_sorted_and_past_excluded() {
        let mut deals = sample();
        deals[0].schedule_activity(crate::model::ActivityKind::Call, "pasada", "2024-01-01");
        deals[0].schedule_activity(crate::model::ActivityKind::Meeting, "lejana", "2025-06-20");
        deals[1].schedule_activity(crate::model::ActivityKind::Note, "cercana", "2025-06-01");

        let today = NaiveDate::from_ymd_opt(2025, 5, 1).expect("date");
        let agenda = upcoming_activities(&deals, today);
        assert_eq!(agenda.len(), 2);
        assert_eq!(agenda[0].activity.content, "cercana");
        assert_eq!(agenda[0].deal_id, "2");
        assert_eq!(agenda[1].activity.content, "lejana");
    }

    #[test]
    fn snapshot_totals_match_filtered_sum() {
        let deals = sample();
        let snap = snapshot(&deals, &Filters::default());
        assert_eq!(snap.deals.len(), 2);
        assert_eq!(snap.total_value, 57000.0);
        assert_eq!(snap.total_value_cop, 57000.0 * USD_TO_COP);
    }
}
