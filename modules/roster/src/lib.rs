#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Roster module: members, teams and dynamic member searches.
//!
//! - [`domain::search::MemberSearchCondition`] collects optional criteria;
//!   unset criteria never narrow a search
//! - [`domain::repo::MemberRepository`] runs flat searches, paged searches
//!   (eager or optimized total count) and bulk writes with one condition
//! - [`infra::storage::SeaOrmMemberRepository`] implements it over `SeaORM`,
//!   with [`infra::storage::migrations::Migrator`] owning the schema
//! - [`domain::service::RosterService`] caps page sizes and logs
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use roster::{MemberSearchCondition, RosterService, SeaOrmMemberRepository, ServiceConfig};
//! use roster_db::{ConnectOpts, DbHandle};
//! use sea_orm_migration::MigratorTrait;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//! roster::Migrator::up(db.conn(), None).await?;
//!
//! let repo = Arc::new(SeaOrmMemberRepository::new(db.conn().clone()));
//! let svc = RosterService::new(repo, ServiceConfig::default());
//! svc.seed_demo().await?;
//!
//! let req = svc.page_request(Some(0), Some(3), Some("-age"))?;
//! let page = svc
//!     .paging_search_optimized(&MemberSearchCondition::new().team_name("team2"), &req)
//!     .await?;
//! assert_eq!(page.total_elements, 3);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod infra;

pub use config::PagingConfig;
pub use domain::error::RosterError;
pub use domain::fixtures::demo_roster;
pub use domain::model::{
    Member, MemberDto, MemberKey, MemberRecord, ModelError, Roster, SavedRoster, Team, TeamKey,
    TeamView,
};
pub use domain::repo::MemberRepository;
pub use domain::search::{MemberSearchCondition, MemberTerm};
pub use domain::service::{RosterService, ServiceConfig};
pub use infra::storage::SeaOrmMemberRepository;
pub use infra::storage::migrations::Migrator;
