#![allow(clippy::unwrap_used, clippy::expect_used)]

//! `OffsetPager` against an in-memory `SQLite` table of seven items.

#[cfg(feature = "sqlite")]
mod sqlite_paging {
    use roster_db::paging::{
        OffsetPager, Page, PageError, PageRequest, PagingError, PagingLimits, Sort, SortDir, SortMap,
    };
    use roster_db::{ConnectOpts, DbHandle};
    use sea_orm::{
        ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
        Select,
    };

    mod item {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "items")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i64,
            pub label: String,
            pub score: i32,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    #[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
    struct Row {
        label: String,
        score: i32,
    }

    async fn seeded() -> DbHandle {
        let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
            .await
            .expect("connect");
        db.conn()
            .execute_unprepared(
                "CREATE TABLE items (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT NOT NULL, score INTEGER NOT NULL)",
            )
            .await
            .unwrap();
        // scores collide so the tiebreaker matters
        db.conn()
            .execute_unprepared(
                "INSERT INTO items (label, score) VALUES \
                 ('a', 3), ('b', 1), ('c', 3), ('d', 2), ('e', 1), ('f', 3), ('g', 2)",
            )
            .await
            .unwrap();
        db
    }

    fn sort_map() -> SortMap<item::Entity> {
        SortMap::new()
            .insert("id", item::Column::Id)
            .insert("label", item::Column::Label)
            .insert("score", item::Column::Score)
    }

    fn projected() -> Select<item::Entity> {
        item::Entity::find()
            .select_only()
            .columns([item::Column::Label, item::Column::Score])
    }

    fn labels(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[tokio::test]
    async fn first_page_of_unsorted_select_uses_id_order() {
        let db = seeded().await;
        let map = sort_map();
        let page = OffsetPager::new(db.conn(), &map)
            .fetch_optimized::<Row>(projected(), &PageRequest::of(0, 3).unwrap())
            .await
            .unwrap();

        assert_eq!(labels(&page.content), ["a", "b", "c"]);
        assert_eq!(page.total_elements, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number, 0);
        assert_eq!(page.size, 3);
    }

    #[tokio::test]
    async fn sort_keys_then_tiebreaker() {
        let db = seeded().await;
        let map = sort_map();
        let req = PageRequest::of(0, 7)
            .unwrap()
            .with_sort(Sort::parse("-score").unwrap());
        let rows = OffsetPager::new(db.conn(), &map)
            .fetch_window::<Row>(projected(), &req)
            .await
            .unwrap();

        assert_eq!(labels(&rows), ["a", "c", "f", "d", "g", "b", "e"]);
    }

    #[tokio::test]
    async fn custom_tiebreaker_direction() {
        let db = seeded().await;
        let map = sort_map();
        let req = PageRequest::of(0, 3)
            .unwrap()
            .with_sort(Sort::by("score", SortDir::Asc));
        let rows = OffsetPager::new(db.conn(), &map)
            .tiebreaker("id", SortDir::Desc)
            .fetch_window::<Row>(projected(), &req)
            .await
            .unwrap();

        assert_eq!(labels(&rows), ["e", "b", "g"]);
    }

    #[tokio::test]
    async fn eager_and_optimized_totals_agree() {
        let db = seeded().await;
        let map = sort_map();
        let pager = OffsetPager::new(db.conn(), &map);
        let filtered = || projected().filter(item::Column::Score.gte(2));

        for (offset, limit) in [(0, 2), (0, 5), (0, 10), (2, 2), (4, 2), (3, 5), (50, 2)] {
            let req = PageRequest::new(offset, limit).unwrap();
            let eager = pager.fetch_eager::<Row>(filtered(), &req).await.unwrap();
            let optimized = pager
                .fetch_optimized::<Row>(filtered(), &req)
                .await
                .unwrap();

            assert_eq!(
                eager.total_elements, 5,
                "eager total at offset={offset} limit={limit}"
            );
            assert_eq!(eager.total_elements, optimized.total_elements);
            assert_eq!(eager.total_pages, optimized.total_pages);
            assert_eq!(eager.content, optimized.content);
        }
    }

    #[tokio::test]
    async fn empty_result_has_zero_total() {
        let db = seeded().await;
        let map = sort_map();
        let pager = OffsetPager::new(db.conn(), &map);
        let req = PageRequest::of(0, 3).unwrap();
        let none = || projected().filter(item::Column::Score.gt(100));

        let eager = pager.fetch_eager::<Row>(none(), &req).await.unwrap();
        let optimized = pager.fetch_optimized::<Row>(none(), &req).await.unwrap();
        assert_eq!(eager, Page::empty(&req));

        for page in [eager, optimized] {
            assert!(page.content.is_empty());
            assert_eq!(page.total_elements, 0);
            assert_eq!(page.total_pages, 0);
        }
    }

    #[tokio::test]
    async fn count_ignores_window() {
        let db = seeded().await;
        let map = sort_map();
        let total = OffsetPager::new(db.conn(), &map)
            .count(projected().filter(item::Column::Score.eq(3)))
            .await
            .unwrap();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn unknown_sort_property_is_rejected() {
        let db = seeded().await;
        let map = sort_map();
        let req = PageRequest::of(0, 3)
            .unwrap()
            .with_sort(Sort::by("colour", SortDir::Asc));
        let err = OffsetPager::new(db.conn(), &map)
            .fetch_optimized::<Row>(projected(), &req)
            .await
            .unwrap_err();
        assert!(matches!(err, PagingError::UnknownSortProperty(p) if p == "colour"));
    }

    #[tokio::test]
    async fn oversized_page_is_rejected() {
        let db = seeded().await;
        let map = sort_map();
        let err = OffsetPager::new(db.conn(), &map)
            .limits(PagingLimits { max_page_size: 4 })
            .fetch_eager::<Row>(projected(), &PageRequest::of(0, 5).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PagingError::InvalidRequest(PageError::LimitTooLarge { limit: 5, max: 4 })
        ));
    }
}
