//! Site views
//!
//! Each view module exposes one renderable unit. Home ships with the
//! application; every other view lives in its own chunk and is fetched the
//! first time its route is visited.

use std::time::Duration;

use kidsafe_router::{lazy, Loader};
use maud::{html, Markup, DOCTYPE};
use tracing::debug;

/// A loaded view module
#[derive(Debug, Clone)]
pub struct ViewModule {
    pub name: &'static str,
    pub title: &'static str,
    /// Chunk the module is split into; `None` for views bundled with the app
    pub chunk: Option<&'static str>,
    body: fn() -> Markup,
}

impl ViewModule {
    /// Renders the full page for this view
    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) " | Kidsafe" }
                }
                body {
                    (nav())
                    main id="app" data-view=(self.name) {
                        ((self.body)())
                    }
                }
            }
        }
    }
}

const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/about", "About"),
    ("/interactive-games", "Games"),
    ("/child-help", "Get Help"),
    ("/safe-sharing", "Share Your Story"),
    ("/login", "Login"),
];

fn nav() -> Markup {
    html! {
        nav {
            ul {
                @for (href, label) in NAV_LINKS {
                    li { a href=(href) { (label) } }
                }
            }
        }
    }
}

/// Wraps a module constructor into a loader that simulates a chunk fetch
pub fn chunk(module: fn() -> ViewModule, latency: Duration) -> Loader<ViewModule> {
    lazy(move || async move {
        let view = module();
        debug!("Fetching chunk {:?} for view {}", view.chunk, view.name);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        Ok(view)
    })
}

pub fn home() -> ViewModule {
    ViewModule {
        name: "home",
        title: "Home",
        chunk: None,
        body: || {
            html! {
                section class="hero" {
                    h1 { "Be safe, be smart, have fun!" }
                    p { "Learn how to stay safe online and at home, and play games along the way." }
                    a class="button" href="/interactive-games" { "Play a game" }
                    a class="button" href="/child-help" { "I need help" }
                }
            }
        },
    }
}

pub fn about() -> ViewModule {
    ViewModule {
        name: "about",
        title: "About Us",
        chunk: Some("AboutView"),
        body: || {
            html! {
                h1 { "About us" }
                section id="mission" {
                    h2 { "Our mission" }
                    p { "Every child deserves to feel safe and to know where to turn." }
                }
                section id="team" {
                    h2 { "Our team" }
                    p { "Counsellors, teachers and volunteers who listen." }
                }
            }
        },
    }
}

pub fn login() -> ViewModule {
    ViewModule {
        name: "login",
        title: "Login",
        chunk: Some("LoginPage"),
        body: || {
            html! {
                h1 { "Welcome back" }
                form method="post" action="/login" {
                    label for="username" { "Username" }
                    input id="username" name="username" type="text";
                    label for="password" { "Password" }
                    input id="password" name="password" type="password";
                    button type="submit" { "Log in" }
                }
            }
        },
    }
}

pub fn interactive_games() -> ViewModule {
    ViewModule {
        name: "interactive-games",
        title: "Interactive Games",
        chunk: Some("InteractiveGames"),
        body: || {
            html! {
                h1 { "Games" }
                ul class="games" {
                    li { a href="/games/memory-match" { "Memory Match" } }
                    li { a href="/games/math-puzzle" { "Math Puzzle" } }
                    li { a href="/games/word-scramble" { "Word Scramble" } }
                    li { a href="/games/coloring-fun" { "Coloring Fun" } }
                }
            }
        },
    }
}

pub fn child_help() -> ViewModule {
    ViewModule {
        name: "child-help",
        title: "Get Help",
        chunk: Some("ChildHelpPage"),
        body: || {
            html! {
                h1 { "You are not alone" }
                section id="call" {
                    h2 { "Call us" }
                    p { "Talk to a counsellor any time, day or night. It is free." }
                }
                section id="chat" {
                    h2 { "Chat with us" }
                    p { "Prefer typing? Send us a message and we will answer." }
                }
            }
        },
    }
}

pub fn safe_sharing() -> ViewModule {
    ViewModule {
        name: "safe-sharing",
        title: "Share Your Story",
        chunk: Some("SafeStoryShare"),
        body: || {
            html! {
                h1 { "Share your story safely" }
                p { "You do not have to tell us your name." }
                form method="post" action="/safe-sharing" {
                    textarea name="story" rows="8" placeholder="What happened?" {}
                    button type="submit" { "Send" }
                }
            }
        },
    }
}

pub fn memory_match() -> ViewModule {
    ViewModule {
        name: "games/memory-match",
        title: "Memory Match",
        chunk: Some("MemoryMatch"),
        body: || game_shell("Memory Match", "Flip two cards and find the pairs."),
    }
}

pub fn math_puzzle() -> ViewModule {
    ViewModule {
        name: "games/math-puzzle",
        title: "Math Puzzle",
        chunk: Some("MathPuzzle"),
        body: || game_shell("Math Puzzle", "Solve the sums before the timer runs out."),
    }
}

pub fn word_scramble() -> ViewModule {
    ViewModule {
        name: "games/word-scramble",
        title: "Word Scramble",
        chunk: Some("WordScramble"),
        body: || game_shell("Word Scramble", "Unscramble the letters to find the safety word."),
    }
}

pub fn coloring_fun() -> ViewModule {
    ViewModule {
        name: "games/coloring-fun",
        title: "Coloring Fun",
        chunk: Some("ColouringFun"),
        body: || game_shell("Coloring Fun", "Pick a color and fill in the picture."),
    }
}

pub fn not_found() -> ViewModule {
    ViewModule {
        name: "not-found",
        title: "Page Not Found",
        chunk: None,
        body: || {
            html! {
                h1 { "Oops, this page is lost" }
                a href="/" { "Go home" }
            }
        },
    }
}

fn game_shell(title: &str, instructions: &str) -> Markup {
    html! {
        h1 { (title) }
        p class="instructions" { (instructions) }
        div id="board" {}
        a href="/interactive-games" { "Back to games" }
    }
}
