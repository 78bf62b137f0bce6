//! Development data seeding

use chrono::{Duration, TimeZone, Utc};

use crate::domain::{DomainError, DomainResult, Item, User};
use super::item::ItemRepository;
use super::traits::Repository;

/// Insert `count` sample items owned by `owner`, but only into an empty
/// item table. Returns how many were inserted.
///
/// Item k is created k days after (2015-12-31 - count days) and has
/// `count - k` views, so recency and popularity rank in opposite orders.
pub async fn seed_sample_items(
    items: &ItemRepository,
    owner: &User,
    count: u32,
) -> DomainResult<u32> {
    if count == 0 || items.count().await? > 0 {
        return Ok(0);
    }

    let base = Utc
        .with_ymd_and_hms(2015, 12, 31, 0, 0, 0)
        .single()
        .and_then(|end| end.checked_sub_signed(Duration::days(i64::from(count))))
        .ok_or_else(|| {
            DomainError::Internal(format!(
                "Cannot date {} sample items back from 2015-12-31",
                count
            ))
        })?;

    for k in 1..=count {
        let created = base + Duration::days(i64::from(k));
        let mut item = Item::new(format!("Item {} Title", k), owner.id.clone(), created);
        item.description = Some(format!(
            "This is a sample description for item {}: Lorem ipsum dolor sit amet.",
            k
        ));
        item.view_count = i64::from(count - k);
        items.create(&item).await?;
    }

    tracing::info!(count, "Seeded sample items");
    Ok(count)
}
