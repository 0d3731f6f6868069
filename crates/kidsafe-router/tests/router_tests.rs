//! Integration tests for kidsafe-router
//!
//! Cover navigation end to end: loading, history, scroll and the
//! last-issued-wins rule for overlapping navigations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kidsafe_router::*;
use pretty_assertions::assert_eq;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::Notify;

type View = &'static str;

fn instant(view: View) -> Loader<View> {
    lazy(move || async move { Ok(view) })
}

fn gated(view: View, gate: Arc<Notify>) -> Loader<View> {
    lazy(move || {
        let gate = Arc::clone(&gate);
        async move {
            gate.notified().await;
            Ok(view)
        }
    })
}

fn counted(view: View, calls: Arc<AtomicUsize>) -> Loader<View> {
    lazy(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::task::yield_now().await;
            Ok(view)
        }
    })
}

fn build(builder: RegistryBuilder<View>, config: RouterConfig) -> (Router<View>, MemoryHistory) {
    let history = MemoryHistory::new();
    let router = Router::new(builder.build(), Arc::new(history.clone()), config);
    (router, history)
}

fn site() -> RegistryBuilder<View> {
    RegistryBuilder::new()
        .eager("/", "home", "home")
        .unwrap()
        .lazy("/about", "about", instant("about"))
        .unwrap()
        .lazy("/interactive-games", "interactive-games", instant("games hub"))
        .unwrap()
        .lazy("/games/memory-match", "games/memory-match", instant("memory match"))
        .unwrap()
}

fn route_of(outcome: &NavigationOutcome<View>) -> &str {
    &outcome.committed().expect("navigation should commit").route
}

#[tokio::test]
async fn test_load_view_returns_same_instance() {
    let (router, _) = build(site(), RouterConfig::default());

    let resolved = router.resolve("/about").into_view().unwrap();
    let first = router.load_view(&resolved).await.unwrap();
    let second = router.load_view(&resolved).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(router.cache_stats().await.loads, 1);
    assert_eq!(router.loaded_views().await, vec!["about", "home"]);
}

#[tokio::test]
async fn test_concurrent_navigations_to_same_route_load_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let builder = site()
        .lazy("/games/math-puzzle", "games/math-puzzle", counted("math puzzle", Arc::clone(&calls)))
        .unwrap();
    let (router, history) = build(builder, RouterConfig::default());

    let (first, second) = tokio::join!(
        router.push("/games/math-puzzle"),
        router.push("/games/math-puzzle")
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(first.unwrap(), NavigationOutcome::Superseded { .. }));
    assert_eq!(route_of(&second.unwrap()), "games/math-puzzle");
    assert_eq!(history.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_later_navigation_wins_when_earlier_finishes_last() {
    let login_gate = Arc::new(Notify::new());
    let builder = site()
        .lazy("/login", "login", gated("login", Arc::clone(&login_gate)))
        .unwrap();
    let (router, history) = build(builder, RouterConfig::default());
    let mut events = router.subscribe();

    let (login, about) = tokio::join!(router.push("/login"), async {
        let outcome = router.push("/about").await;
        login_gate.notify_one();
        outcome
    });

    assert!(matches!(login.unwrap(), NavigationOutcome::Superseded { ref path } if path == "/login"));
    assert_eq!(route_of(&about.unwrap()), "about");
    assert_eq!(router.current().await.unwrap().route, "about");

    // Only the winning navigation was ever shown
    assert_eq!(events.try_recv().unwrap().route, "about");
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(history.len().await.unwrap(), 1);

    // The discarded load still warmed the cache
    assert_eq!(router.load_state("login").await, LoadState::Loaded);
}

#[tokio::test]
async fn test_later_navigation_wins_when_earlier_finishes_first() {
    let login_gate = Arc::new(Notify::new());
    let about_gate = Arc::new(Notify::new());
    let builder = RegistryBuilder::new()
        .lazy("/login", "login", gated("login", Arc::clone(&login_gate)))
        .unwrap()
        .lazy("/about", "about", gated("about", Arc::clone(&about_gate)))
        .unwrap();
    let (router, _) = build(builder, RouterConfig::default());

    let (login, about, _) = tokio::join!(router.push("/login"), router.push("/about"), async {
        tokio::task::yield_now().await;
        login_gate.notify_one();
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        about_gate.notify_one();
    });

    assert!(matches!(login.unwrap(), NavigationOutcome::Superseded { .. }));
    assert_eq!(route_of(&about.unwrap()), "about");
    assert_eq!(router.current().await.unwrap().route, "about");
}

#[tokio::test]
async fn test_scroll_policy_applied_on_commit() {
    let (router, _) = build(site(), RouterConfig::default());

    let outcome = router.push("/about#team").await.unwrap();
    assert_eq!(
        outcome.committed().unwrap().scroll,
        ScrollTarget::Element {
            id: "team".to_string(),
            behavior: ScrollBehavior::Smooth
        }
    );

    let outcome = router.push("/about").await.unwrap();
    assert_eq!(outcome.committed().unwrap().scroll, ScrollTarget::top());
}

#[tokio::test]
async fn test_load_failure_propagates_and_is_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let loader: Loader<View> = {
        let attempts = Arc::clone(&attempts);
        lazy(move || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(LoadError::new("chunk request timed out"))
                } else {
                    Ok("login")
                }
            }
        })
    };
    let builder = site().lazy("/login", "login", loader).unwrap();
    let (router, history) = build(builder, RouterConfig::default());

    router.push("/").await.unwrap();

    let err = router.push("/login").await.unwrap_err();
    assert!(matches!(err, RouterError::Load { ref route, .. } if route == "login"));
    assert_eq!(router.current().await.unwrap().route, "home");
    assert_eq!(history.len().await.unwrap(), 1);

    let outcome = router.push("/login").await.unwrap();
    assert_eq!(route_of(&outcome), "login");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(router.cache_stats().await.failures, 1);
}

#[tokio::test]
async fn test_back_and_forward() {
    let (router, history) = build(site(), RouterConfig::default());

    router.replace("/").await.unwrap();
    router.push("/interactive-games").await.unwrap();
    router.save_scroll_position(ScrollPosition::new(0.0, 640.0)).await.unwrap();
    router.push("/games/memory-match").await.unwrap();

    let back = router.back().await.unwrap().unwrap();
    let navigation = back.committed().unwrap();
    assert_eq!(navigation.route, "interactive-games");
    // Saved positions are ignored unless restoring is enabled
    assert_eq!(navigation.scroll, ScrollTarget::top());
    assert_eq!(history.index().await, Some(1));

    let forward = router.forward().await.unwrap().unwrap();
    assert_eq!(route_of(&forward), "games/memory-match");
    assert!(router.forward().await.unwrap().is_none());
    assert_eq!(history.len().await.unwrap(), 3);
}

#[tokio::test]
async fn test_back_restores_saved_position_when_enabled() {
    let config = RouterConfig {
        restore_saved_position: true,
        ..RouterConfig::default()
    };
    let (router, _) = build(site(), config);

    router.push("/interactive-games").await.unwrap();
    router.save_scroll_position(ScrollPosition::new(0.0, 640.0)).await.unwrap();
    router.push("/games/memory-match").await.unwrap();

    let back = router.back().await.unwrap().unwrap();
    assert_eq!(
        back.committed().unwrap().scroll,
        ScrollTarget::Position {
            position: ScrollPosition::new(0.0, 640.0),
            behavior: ScrollBehavior::Instant
        }
    );
}

#[tokio::test]
async fn test_not_found_without_fallback() {
    let (router, history) = build(site(), RouterConfig::default());

    let outcome = router.push("/nonexistent").await.unwrap();
    assert!(matches!(outcome, NavigationOutcome::NotFound { ref path } if path == "/nonexistent"));
    assert!(router.current().await.is_none());
    assert_eq!(history.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_not_found_fallback_view() {
    let builder = site()
        .not_found("/", "not-found", ViewSource::Lazy(instant("lost")))
        .unwrap();
    let (router, _) = build(builder, RouterConfig::default());

    let outcome = router.push("/games/chess?level=2").await.unwrap();
    let navigation = outcome.committed().unwrap();
    assert_eq!(navigation.route, "not-found");
    assert_eq!(*navigation.view, "lost");
    assert_eq!(navigation.href, "/games/chess?level=2");
    assert!(navigation.is_fallback);
}

#[tokio::test]
async fn test_base_path_in_hrefs() {
    let config = RouterConfig {
        base_path: "/kids/".to_string(),
        ..RouterConfig::default()
    };
    let (router, history) = build(site(), config);

    router.push("/about").await.unwrap();
    router.push("/kids/interactive-games#memory").await.unwrap();

    let hrefs: Vec<String> = history.entries().await.into_iter().map(|e| e.href).collect();
    assert_eq!(hrefs, vec!["/kids/about", "/kids/interactive-games#memory"]);
    assert_eq!(
        router.current().await.unwrap().location.path,
        "/interactive-games"
    );
}

#[tokio::test]
async fn test_replace_keeps_history_length() {
    let (router, history) = build(site(), RouterConfig::default());

    router.replace("/").await.unwrap();
    router.push("/about").await.unwrap();
    router.replace("/interactive-games").await.unwrap();

    assert_eq!(history.len().await.unwrap(), 2);
    assert_eq!(
        history.current().await.unwrap().unwrap().href,
        "/interactive-games"
    );
}

#[test]
fn test_configuration_errors_are_fatal_kind() {
    let err = site().lazy("/about", "about-again", instant("about")).err().unwrap();
    assert!(err.is_configuration());

    let err = site().lazy("/team", "about", instant("team")).err().unwrap();
    assert!(matches!(err, RouterError::DuplicateName(_)));
}
