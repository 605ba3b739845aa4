//! 접근 권한 판정과 페이지네이션 속성 테스트.

use admin_core::{paginate, AccessLevel, Action, Capability, Grants, Resource, PAGE_SIZE};
use proptest::prelude::*;

fn resource_strategy() -> impl Strategy<Value = Resource> {
    prop::sample::select(Resource::ALL.to_vec())
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Read), Just(Action::Write)]
}

proptest! {
    #[test]
    fn edit_allows_every_action(resource in resource_strategy(), action in action_strategy()) {
        let grants: Grants = [Capability::new(AccessLevel::Edit, resource)].into_iter().collect();
        prop_assert!(grants.allows(resource, action));
    }

    #[test]
    fn view_allows_only_reads(resource in resource_strategy()) {
        let grants: Grants = [Capability::new(AccessLevel::View, resource)].into_iter().collect();
        prop_assert!(grants.allows(resource, Action::Read));
        prop_assert!(!grants.allows(resource, Action::Write));
    }

    #[test]
    fn other_pages_grant_nothing(
        granted in resource_strategy(),
        requested in resource_strategy(),
        action in action_strategy(),
    ) {
        prop_assume!(granted != requested);
        let grants: Grants = [
            Capability::new(AccessLevel::View, granted),
            Capability::new(AccessLevel::Edit, granted),
        ]
        .into_iter()
        .collect();
        prop_assert!(!grants.allows(requested, action));
    }

    #[test]
    fn last_page_covers_all_items(total in 0i64..10_000) {
        let meta = admin_core::PageMeta::new(total, admin_core::PageRequest::new(1));
        prop_assert!(meta.last_page * PAGE_SIZE >= total);
        prop_assert!((meta.last_page - 1).max(0) * PAGE_SIZE < total.max(1));
    }
}

#[test]
fn editor_with_edit_orders_can_delete_orders_but_not_users() {
    let grants = Grants::from_names(["edit-orders"]);
    assert!(grants.allows(Resource::Orders, Action::from_method(&http::Method::DELETE)));
    assert!(!grants.allows(Resource::Users, Action::from_method(&http::Method::DELETE)));
}

#[tokio::test]
async fn sixteen_items_span_two_pages() {
    let items: Vec<u32> = (0..16).collect();

    let first = paginate(&items, 1).await.unwrap();
    assert_eq!(first.data.len(), 15);
    assert_eq!(first.meta.last_page, 2);

    let second = paginate(&items, 2).await.unwrap();
    assert_eq!(second.data, vec![15]);
}

#[tokio::test]
async fn empty_source_has_no_pages() {
    let items: Vec<u32> = Vec::new();
    let page = paginate(&items, 1).await.unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.meta.total, 0);
    assert_eq!(page.meta.last_page, 0);
}
