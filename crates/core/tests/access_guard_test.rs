//! Access guard decisions across every session shape

use medibook_core::{
    AccessGuard, AllowedRoles, AppConfig, GuardDecision, Identity, Redirect, Role, SessionProvider,
    SessionState, SessionStore,
};

fn identity(role: Role) -> Identity {
    Identity::new(format!("{role}-1"), format!("{role}@example.com"), role)
}

/// Every allowed-roles argument worth checking: unset, empty, and each single role
fn allowed_variants() -> Vec<Option<AllowedRoles>> {
    let mut variants = vec![None, Some(AllowedRoles::default())];
    variants.extend(Role::ALL.into_iter().map(|r| Some(AllowedRoles::new([r]))));
    variants.push(Some(AllowedRoles::new(Role::ALL)));
    variants
}

fn identity_variants() -> Vec<Option<Identity>> {
    let mut variants = vec![None];
    variants.extend(Role::ALL.into_iter().map(|r| Some(identity(r))));
    variants
}

#[test]
fn test_loading_always_suspends() {
    let guard = AccessGuard::default();
    for identity in identity_variants() {
        for allowed in allowed_variants() {
            let state = SessionState {
                identity: identity.clone(),
                loading: true,
            };
            assert_eq!(
                guard.decide(&state, allowed.as_ref(), "/Administrator"),
                GuardDecision::Suspend,
                "identity={identity:?} allowed={allowed:?}"
            );
        }
    }
}

#[test]
fn test_anonymous_always_redirects_to_login() {
    let guard = AccessGuard::default();
    let state = SessionState::resolved(None);
    for allowed in allowed_variants() {
        let decision = guard.decide(&state, allowed.as_ref(), "/Patient");
        assert_eq!(decision.redirect_path(), Some("/auth/login"));
    }
}

#[test]
fn test_anonymous_request_keeps_origin() {
    let guard = AccessGuard::default();
    let allowed = AllowedRoles::new([Role::Administrator]);
    let decision = guard.decide(&SessionState::resolved(None), Some(&allowed), "/Administrator");
    assert_eq!(
        decision,
        GuardDecision::Redirect(Redirect {
            to: "/auth/login".to_string(),
            origin: Some("/Administrator".to_string()),
        })
    );
}

#[test]
fn test_doctor_on_admin_route_goes_home() {
    let guard = AccessGuard::default();
    let allowed = AllowedRoles::new([Role::Administrator]);
    let state = SessionState::resolved(Some(identity(Role::Doctor)));
    assert_eq!(
        guard.decide(&state, Some(&allowed), "/Administrator").redirect_path(),
        Some("/Doctor")
    );
}

#[test]
fn test_patient_renders_without_restriction() {
    let guard = AccessGuard::default();
    let state = SessionState::resolved(Some(identity(Role::Patient)));
    assert_eq!(guard.decide(&state, None, "/profile"), GuardDecision::Render);
}

#[test]
fn test_empty_allowed_roles_behaves_like_unset() {
    let guard = AccessGuard::default();
    for role in Role::ALL {
        let state = SessionState::resolved(Some(identity(role)));
        let empty = AllowedRoles::default();
        assert_eq!(
            guard.decide(&state, Some(&empty), "/profile"),
            guard.decide(&state, None, "/profile")
        );
        assert_eq!(guard.decide(&state, Some(&empty), "/profile"), GuardDecision::Render);
    }
}

#[test]
fn test_render_requires_identity_and_permitted_role() {
    let guard = AccessGuard::default();
    for identity in identity_variants() {
        for allowed in allowed_variants() {
            let state = SessionState::resolved(identity.clone());
            let decision = guard.decide(&state, allowed.as_ref(), "/somewhere");
            let expect_render = identity.as_ref().is_some_and(|id| {
                allowed.as_ref().is_none_or(|a| a.is_empty() || a.contains(id.role))
            });
            assert_eq!(
                decision == GuardDecision::Render,
                expect_render,
                "identity={identity:?} allowed={allowed:?} decision={decision:?}"
            );
        }
    }
}

#[test]
fn test_decisions_are_idempotent() {
    let guard = AccessGuard::default();
    for identity in identity_variants() {
        for allowed in allowed_variants() {
            for loading in [true, false] {
                let state = SessionState {
                    identity: identity.clone(),
                    loading,
                };
                let first = guard.decide(&state, allowed.as_ref(), "/Doctor");
                let second = guard.decide(&state, allowed.as_ref(), "/Doctor");
                assert_eq!(first, second);
            }
        }
    }
}

#[test]
fn test_origin_never_changes_branch() {
    let guard = AccessGuard::default();
    let allowed = AllowedRoles::new([Role::Doctor]);
    let state = SessionState::resolved(Some(identity(Role::Patient)));
    for origin in ["/Doctor", "/", "/auth/login", "/Patient"] {
        assert_eq!(
            guard.decide(&state, Some(&allowed), origin).redirect_path(),
            Some("/Patient")
        );
    }
}

#[test]
fn test_store_changes_drive_reevaluation() {
    let policy = AppConfig::load().unwrap().access_policy().unwrap();
    let store = SessionStore::default();
    let decide = |store: &SessionStore| {
        policy
            .routes
            .evaluate(&policy.guard, &store.state(), "/Doctor/appointments")
    };

    assert_eq!(decide(&store), GuardDecision::Suspend);

    store.resolve(None);
    assert_eq!(decide(&store).redirect_path(), Some("/auth/login"));

    store.set_identity(identity(Role::Doctor));
    assert_eq!(decide(&store), GuardDecision::Render);

    store.clear_identity();
    assert_eq!(decide(&store).redirect_path(), Some("/auth/login"));

    store.begin_check();
    assert_eq!(decide(&store), GuardDecision::Suspend);
}
