use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use roster_db::paging::{Page, PageRequest, Sort, SortDir};
use tracing_test::traced_test;

use super::error::RosterError;
use super::model::{MemberDto, MemberRecord, Roster, SavedRoster, TeamView};
use super::repo::MemberRepository;
use super::search::MemberSearchCondition;
use super::service::{RosterService, ServiceConfig};

// Mock repository: serves a fixed member list and counts repository calls
#[derive(Default)]
struct MockRepository {
    members: Vec<MemberDto>,
    team: Option<TeamView>,
    calls: AtomicUsize,
}

impl MockRepository {
    fn with_members(members: Vec<MemberDto>) -> Self {
        Self {
            members,
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn window(&self, req: &PageRequest) -> Page<MemberDto> {
        let start = usize::try_from(req.offset()).unwrap();
        let len = usize::try_from(req.limit()).unwrap();
        let content = self.members.iter().skip(start).take(len).cloned().collect();
        Page::new(content, req, self.members.len() as u64)
    }
}

#[async_trait]
impl MemberRepository for MockRepository {
    async fn search(&self, _cond: &MemberSearchCondition) -> Result<Vec<MemberDto>, RosterError> {
        self.hit();
        Ok(self.members.clone())
    }

    async fn paging_search(
        &self,
        _cond: &MemberSearchCondition,
        req: &PageRequest,
    ) -> Result<Page<MemberDto>, RosterError> {
        self.hit();
        Ok(self.window(req))
    }

    async fn paging_search_optimized(
        &self,
        _cond: &MemberSearchCondition,
        req: &PageRequest,
    ) -> Result<Page<MemberDto>, RosterError> {
        self.hit();
        Ok(self.window(req))
    }

    async fn count(&self, _cond: &MemberSearchCondition) -> Result<u64, RosterError> {
        self.hit();
        Ok(self.members.len() as u64)
    }

    async fn save_roster(&self, roster: &Roster) -> Result<SavedRoster, RosterError> {
        self.hit();
        Ok(SavedRoster {
            teams: roster.teams().zip(1..).map(|((k, _), id)| (k, id)).collect(),
            members: roster.members().zip(1..).map(|((k, _), id)| (k, id)).collect(),
        })
    }

    async fn find_team(&self, _team_id: i64) -> Result<Option<TeamView>, RosterError> {
        self.hit();
        Ok(self.team.clone())
    }

    async fn change_team(
        &self,
        member_id: i64,
        team_id: i64,
    ) -> Result<MemberRecord, RosterError> {
        self.hit();
        if member_id > 5 {
            return Err(RosterError::MemberNotFound(member_id));
        }
        Ok(MemberRecord {
            id: member_id,
            name: Some(format!("member{member_id}")),
            age: 10,
            team_id: Some(team_id),
        })
    }

    async fn bulk_add_age(
        &self,
        _cond: &MemberSearchCondition,
        _delta: i32,
    ) -> Result<u64, RosterError> {
        self.hit();
        Ok(self.members.len() as u64)
    }

    async fn bulk_delete(&self, _cond: &MemberSearchCondition) -> Result<u64, RosterError> {
        self.hit();
        Ok(self.members.len() as u64)
    }
}

fn five_members() -> Vec<MemberDto> {
    (1..=5)
        .map(|i| MemberDto::new(format!("member{i}"), i * 5))
        .collect()
}

fn service(repo: Arc<MockRepository>) -> RosterService {
    RosterService::new(
        repo,
        ServiceConfig {
            default_page_size: 3,
            max_page_size: 10,
        },
    )
}

#[test]
fn page_request_uses_configured_default_size() {
    let svc = service(Arc::new(MockRepository::default()));
    let req = svc.page_request(None, None, None).unwrap();
    assert_eq!(req.offset(), 0);
    assert_eq!(req.limit(), 3);
    assert!(req.sort().is_empty());
}

#[test]
fn page_request_parses_sort() {
    let svc = service(Arc::new(MockRepository::default()));
    let req = svc.page_request(Some(2), Some(4), Some("-age,name")).unwrap();
    assert_eq!(req.offset(), 8);
    assert_eq!(
        req.sort(),
        &Sort::by("age", SortDir::Desc).then("name", SortDir::Asc)
    );
}

#[test]
fn page_request_rejects_bad_input() {
    let svc = service(Arc::new(MockRepository::default()));
    for (page, size) in [(Some(-1), Some(3)), (None, Some(0)), (None, Some(-2)), (None, Some(11))] {
        let err = svc.page_request(page, size, None).unwrap_err();
        assert!(
            matches!(err, RosterError::InvalidArgument(_)),
            "page={page:?} size={size:?} gave {err}"
        );
    }
}

#[tokio::test]
async fn paging_search_returns_first_window() {
    let repo = Arc::new(MockRepository::with_members(five_members()));
    let svc = service(repo.clone());
    let req = PageRequest::of(0, 3).unwrap();

    let page = svc
        .paging_search(&MemberSearchCondition::new(), &req)
        .await
        .unwrap();

    assert_eq!(page.content.len(), 3);
    assert_eq!(page.total_elements, 5);
    assert_eq!(page.total_pages, 2);
    assert_eq!(repo.calls(), 1);
}

#[tokio::test]
async fn oversized_request_never_reaches_repository() {
    let repo = Arc::new(MockRepository::with_members(five_members()));
    let svc = service(repo.clone());
    let req = PageRequest::of(0, 50).unwrap();

    let eager = svc
        .paging_search(&MemberSearchCondition::new(), &req)
        .await;
    let optimized = svc
        .paging_search_optimized(&MemberSearchCondition::new(), &req)
        .await;

    assert!(matches!(eager, Err(RosterError::InvalidArgument(_))));
    assert!(matches!(optimized, Err(RosterError::InvalidArgument(_))));
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn get_team_maps_missing_to_not_found() {
    let svc = service(Arc::new(MockRepository::default()));
    let err = svc.get_team(42).await.unwrap_err();
    assert!(matches!(err, RosterError::TeamNotFound(42)));
}

#[tokio::test]
async fn get_team_returns_view() {
    let repo = Arc::new(MockRepository {
        team: Some(TeamView {
            id: 1,
            name: "team1".to_owned(),
            members: Vec::new(),
        }),
        ..Default::default()
    });
    let team = service(repo).get_team(1).await.unwrap();
    assert_eq!(team.name, "team1");
}

#[tokio::test]
async fn change_team_propagates_not_found() {
    let svc = service(Arc::new(MockRepository::default()));
    let moved = svc.change_team(2, 1).await.unwrap();
    assert_eq!(moved.team_id, Some(1));
    assert!(matches!(
        svc.change_team(99, 1).await,
        Err(RosterError::MemberNotFound(99))
    ));
}

#[tokio::test]
async fn seed_demo_saves_two_teams_and_five_members() {
    let repo = Arc::new(MockRepository::default());
    let saved = service(repo.clone()).seed_demo().await.unwrap();
    assert_eq!(saved.teams.len(), 2);
    assert_eq!(saved.members.len(), 5);
    assert_eq!(repo.calls(), 1);
}

#[tokio::test]
#[traced_test]
async fn unconstrained_bulk_delete_is_logged() {
    let repo = Arc::new(MockRepository::with_members(five_members()));
    let affected = service(repo)
        .bulk_delete(&MemberSearchCondition::new())
        .await
        .unwrap();
    assert_eq!(affected, 5);
    assert!(logs_contain("bulk delete without criteria"));
}

#[tokio::test]
#[traced_test]
async fn filtered_bulk_delete_is_not_warned() {
    let repo = Arc::new(MockRepository::with_members(five_members()));
    service(repo)
        .bulk_delete(&MemberSearchCondition::new().team_name("team2"))
        .await
        .unwrap();
    assert!(!logs_contain("bulk delete without criteria"));
    assert!(logs_contain("bulk delete"));
}
