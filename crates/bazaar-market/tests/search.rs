// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The listing pipeline: scopes, status partition, keyword, sort, and paging.

use std::time::Duration;

use bazaar_core::BazaarError;
use bazaar_market::{ListingFilter, ListingView};
use bazaar_test_utils::TestHarness;

fn filter() -> ListingFilter {
    ListingFilter::default()
}

/// seller owns Lamp (sold to buyer), Desk Lamp, and Table, created in that order.
async fn seeded() -> (TestHarness, Vec<String>) {
    let h = TestHarness::builder().build().await.unwrap();
    h.register("seller", "Seller").await.unwrap();
    h.register("buyer", "Buyer").await.unwrap();

    let mut ids = Vec::new();
    for (name, price) in [("Lamp", 500), ("Desk Lamp", 2500), ("Table", 9000)] {
        ids.push(h.create_listing("seller", name, price).await.unwrap().id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    h.market.purchase(&h.identity("buyer"), &ids[0]).await.unwrap();
    (h, ids)
}

fn names(page: &bazaar_core::types::ListingPage) -> Vec<&str> {
    page.products.iter().map(|l| l.name.as_str()).collect()
}

#[tokio::test]
async fn status_filters_partition_the_scope() {
    let (h, _) = seeded().await;

    let all = h.market.browse(None, ListingView::All, &filter()).await.unwrap();
    let selling = h
        .market
        .browse(
            None,
            ListingView::All,
            &ListingFilter {
                status: Some("selling".into()),
                ..filter()
            },
        )
        .await
        .unwrap();
    let sold = h
        .market
        .browse(
            None,
            ListingView::All,
            &ListingFilter {
                status: Some("sold".into()),
                ..filter()
            },
        )
        .await
        .unwrap();

    assert_eq!(all.total, 3);
    assert_eq!(selling.total + sold.total, all.total);
    assert!(selling.products.iter().all(|l| !l.is_sold()));
    assert!(sold.products.iter().all(|l| l.is_sold()));
    assert_eq!(names(&sold), vec!["Lamp"]);

    // Unknown status values are ignored.
    let lenient = h
        .market
        .browse(
            None,
            ListingView::All,
            &ListingFilter {
                status: Some("archived".into()),
                ..filter()
            },
        )
        .await
        .unwrap();
    assert_eq!(lenient.total, 3);
}

#[tokio::test]
async fn sort_orders() {
    let (h, _) = seeded().await;
    let sorted = |sort: &str| ListingFilter {
        sort: Some(sort.into()),
        ..filter()
    };

    let newest = h.market.browse(None, ListingView::All, &filter()).await.unwrap();
    assert_eq!(names(&newest), vec!["Table", "Desk Lamp", "Lamp"]);

    let oldest = h.market.browse(None, ListingView::All, &sorted("oldest")).await.unwrap();
    assert_eq!(names(&oldest), vec!["Lamp", "Desk Lamp", "Table"]);

    let cheap = h.market.browse(None, ListingView::All, &sorted("price_asc")).await.unwrap();
    assert!(cheap.products.windows(2).all(|w| w[0].price <= w[1].price));

    let dear = h.market.browse(None, ListingView::All, &sorted("price_desc")).await.unwrap();
    assert!(dear.products.windows(2).all(|w| w[0].price >= w[1].price));

    let bogus = h.market.browse(None, ListingView::All, &sorted("random")).await.unwrap();
    assert_eq!(names(&bogus), names(&newest));
}

#[tokio::test]
async fn likes_sort_uses_counts_then_recency() {
    let (h, ids) = seeded().await;
    for fan in ["f1", "f2"] {
        h.register(fan, fan).await.unwrap();
    }
    h.market.toggle_like(&h.identity("f1"), &ids[0]).await.unwrap();
    h.market.toggle_like(&h.identity("f2"), &ids[0]).await.unwrap();
    h.market.toggle_like(&h.identity("f1"), &ids[1]).await.unwrap();

    let page = h
        .market
        .browse(
            Some(&h.identity("f1")),
            ListingView::All,
            &ListingFilter {
                sort: Some("likes".into()),
                ..filter()
            },
        )
        .await
        .unwrap();
    assert_eq!(names(&page), vec!["Lamp", "Desk Lamp", "Table"]);
    let counts: Vec<_> = page.products.iter().map(|l| l.like_count).collect();
    assert_eq!(counts, vec![2, 1, 0]);
    let liked: Vec<_> = page.products.iter().map(|l| l.is_liked).collect();
    assert_eq!(liked, vec![true, true, false]);
}

#[tokio::test]
async fn keyword_matches_name_substrings() {
    let (h, _) = seeded().await;
    let page = h
        .market
        .browse(
            None,
            ListingView::All,
            &ListingFilter {
                keyword: Some(" Lamp ".into()),
                ..filter()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let wildcard = h
        .market
        .browse(
            None,
            ListingView::All,
            &ListingFilter {
                keyword: Some("%".into()),
                ..filter()
            },
        )
        .await
        .unwrap();
    assert_eq!(wildcard.total, 0);
}

#[tokio::test]
async fn pagination_reports_total_under_filter() {
    let (h, _) = seeded().await;
    let page = |n: i64| ListingFilter {
        page: Some(n),
        limit: Some(2),
        ..filter()
    };

    let first = h.market.browse(None, ListingView::All, &page(1)).await.unwrap();
    let second = h.market.browse(None, ListingView::All, &page(2)).await.unwrap();
    let beyond = h.market.browse(None, ListingView::All, &page(9)).await.unwrap();

    assert_eq!((first.products.len(), first.total, first.limit), (2, 3, 2));
    assert_eq!((second.products.len(), second.total), (1, 3));
    assert!(beyond.products.is_empty());
    assert_eq!(beyond.total, 3);

    let clamped = h
        .market
        .browse(
            None,
            ListingView::All,
            &ListingFilter {
                page: Some(0),
                limit: Some(10_000),
                ..filter()
            },
        )
        .await
        .unwrap();
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.limit, 100);
}

#[tokio::test]
async fn personal_views() {
    let (h, ids) = seeded().await;
    let buyer = h.identity("buyer");
    h.market.toggle_like(&buyer, &ids[2]).await.unwrap();

    let selling = h
        .market
        .browse(Some(&h.identity("seller")), ListingView::MySelling, &filter())
        .await
        .unwrap();
    assert_eq!(selling.total, 3);

    let purchases = h
        .market
        .browse(Some(&buyer), ListingView::MyPurchases, &filter())
        .await
        .unwrap();
    assert_eq!(names(&purchases), vec!["Lamp"]);

    let likes = h
        .market
        .browse(Some(&buyer), ListingView::MyLikes, &filter())
        .await
        .unwrap();
    assert_eq!(names(&likes), vec!["Table"]);
    assert!(likes.products[0].is_liked);

    let seller_id = h.market.me(&h.identity("seller")).await.unwrap().id;
    let by_user = h
        .market
        .browse(None, ListingView::ByUser(seller_id), &filter())
        .await
        .unwrap();
    assert_eq!(by_user.total, 3);

    let nobody = h
        .market
        .browse(None, ListingView::ByUser("unknown".into()), &filter())
        .await
        .unwrap();
    assert_eq!(nobody.total, 0);
}

#[tokio::test]
async fn personal_views_need_a_registered_caller() {
    let (h, _) = seeded().await;

    let anonymous = h
        .market
        .browse(None, ListingView::MyLikes, &filter())
        .await
        .unwrap_err();
    assert!(matches!(anonymous, BazaarError::Unauthenticated(_)));

    let unregistered = h
        .market
        .browse(Some(&h.identity("ghost")), ListingView::MySelling, &filter())
        .await
        .unwrap_err();
    assert!(matches!(unregistered, BazaarError::AccountNotFound));

    // An unregistered viewer browses the public feed as anonymous.
    let feed = h
        .market
        .browse(Some(&h.identity("ghost")), ListingView::All, &filter())
        .await
        .unwrap();
    assert!(feed.products.iter().all(|l| !l.is_liked));
}
