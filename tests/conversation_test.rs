//! End-to-end conversation extraction tests.
//!
//! Each test builds a synthetic chat page and checks the emitted Markdown.

use grok_convo_scraper::{scrape, scrape_conversation, scrape_with_options, Content, Options, Speaker};

/// Drop the export timestamp line, the only non-deterministic part.
fn without_timestamp(markdown: &str) -> String {
    markdown
        .lines()
        .filter(|line| !line.starts_with("*Exported on: "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn heading_count(markdown: &str, heading: &str) -> usize {
    markdown.lines().filter(|line| *line == heading).count()
}

const INSTRUCTIONS: &str = "## Instructions for Grok\n\n\
    Continue the conversation from the last message, using the context provided above.\n";

#[test]
fn test_role_class_scenario() {
    let html = r#"<html><body>
        <div class="items-end group flex flex-col">Hello there</div>
        <div class="items-start group flex flex-col"><strong>Hi</strong></div>
    </body></html>"#;

    let markdown = scrape(html);
    assert!(markdown.starts_with("# Grok Conversation\n\n*Exported on: "));

    let body = markdown.split_once("*\n\n").map(|(_, body)| body).unwrap();
    assert_eq!(
        body,
        format!("## User\n\n> Hello there\n\n## Grok\n\n**Hi**\n\n{INSTRUCTIONS}")
    );
}

#[test]
fn test_plain_page_scenario() {
    let markdown = scrape("<html><body>Just a plain page.</body></html>");

    assert!(markdown.starts_with("# Grok Conversation\n\n*Exported on: "));
    assert!(markdown.contains("## Raw Content\n\nJust a plain page.\n\n"));
    assert!(markdown.ends_with(
        "*Note: The scraper couldn't identify the conversation structure. This is the raw page content.*\n"
    ));
    assert_eq!(heading_count(&markdown, "## User"), 0);
    assert_eq!(heading_count(&markdown, "## Grok"), 0);
    assert!(!markdown.contains("## Instructions for Grok"));
}

#[test]
fn test_turns_follow_document_order() {
    let html = r#"
        <h1>Weekend plans</h1>
        <section>
            <div class="items-end group flex flex-col">Any hiking ideas nearby?</div>
            <div class="items-start group flex flex-col"><p>Try the <em>ridge trail</em>.</p></div>
            <div class="items-end group flex flex-col">How long does it take?</div>
            <div class="items-start group flex flex-col"><p>About three hours.</p></div>
        </section>
    "#;

    let conversation = scrape_conversation(html, &Options::default());
    assert_eq!(conversation.title, "Weekend plans");
    assert_eq!(conversation.counts(), (2, 2));

    let speakers: Vec<_> = conversation.messages().iter().map(|m| m.speaker).collect();
    assert_eq!(
        speakers,
        vec![Speaker::User, Speaker::Assistant, Speaker::User, Speaker::Assistant]
    );
    assert!(conversation.messages().windows(2).all(|w| w[0].dom_position < w[1].dom_position));

    let body = &conversation.body;
    let first = body.find("> Any hiking ideas nearby?").unwrap();
    let second = body.find("Try the *ridge trail*.").unwrap();
    let third = body.find("> How long does it take?").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn test_winning_strategy_excludes_other_candidates() {
    let html = r#"
        <div class="message-list">
            <div class="items-end group flex flex-col">Explain ownership briefly</div>
            <div class="items-start group flex flex-col message-bubble">Each value has one owner.</div>
        </div>
        <div class="message sidebar">Recent chats: a very long history list</div>
        <p>Footer text long enough to count as a paragraph</p>
    "#;

    let markdown = scrape(html);
    assert_eq!(heading_count(&markdown, "## User"), 1);
    assert_eq!(heading_count(&markdown, "## Grok"), 1);
    assert!(!markdown.contains("Recent chats"));
    assert!(!markdown.contains("Footer text"));
}

#[test]
fn test_ten_character_user_turn_is_excluded() {
    let page = |user: &str| {
        format!(
            r#"<div class="items-end group flex flex-col">{user}</div>
               <div class="items-start group flex flex-col">Sure.</div>"#
        )
    };

    let short = scrape_conversation(&page("0123456789"), &Options::default());
    assert!(matches!(short.content, Content::Raw(_)));

    let long = scrape_conversation(&page("01234567890"), &Options::default());
    assert_eq!(long.counts(), (1, 1));
    assert_eq!(long.messages()[0].text, "01234567890");
}

#[test]
fn test_extraction_is_idempotent() {
    let html = r#"
        <h1 class="title">Sorting</h1>
        <div class="items-end group flex flex-col">How do I sort a vector?</div>
        <div class="items-start group flex flex-col">
            <div class="message-bubble"><p>Use <code>v.sort()</code>:</p><pre><code>let mut v = vec![3, 1];
v.sort();</code></pre></div>
        </div>
    "#;

    let first = without_timestamp(&scrape(html));
    let second = without_timestamp(&scrape(html));
    assert_eq!(first, second);
    assert!(first.contains("```\nlet mut v = vec![3, 1];\nv.sort();\n```"));
}

#[test]
fn test_multiline_user_turn_is_quoted_per_line() {
    let html = r#"
        <div class="items-end group flex flex-col">First line of my question<br>and a second line</div>
        <div class="items-start group flex flex-col"><p>Answer.</p></div>
    "#;
    let markdown = scrape(html);
    assert!(markdown.contains("## User\n\n> First line of my question\n> and a second line\n\n## Grok"));
}

#[test]
fn test_pasted_instructions_heading_keeps_the_section() {
    let html = r#"
        <div class="items-end group flex flex-col">Continue from my old export:<br>## Instructions for Grok<br>please</div>
        <div class="items-start group flex flex-col"><p>Sure, continuing.</p></div>
    "#;
    let conversation = scrape_conversation(html, &Options::default());
    assert_eq!(conversation.counts(), (1, 1));

    let markdown = scrape(html);
    assert!(markdown.contains("> Continue from my old export:\n> ## Instructions for Grok\n> please\n\n"));
    assert_eq!(heading_count(&markdown, "## Instructions for Grok"), 1);
    assert!(markdown.ends_with(&format!("## Grok\n\nSure, continuing.\n\n{INSTRUCTIONS}")));
}

#[test]
fn test_relaxed_structure() {
    let html = r#"
        <div class="relative group flex items-end"><span>Is Rust memory safe?</span></div>
        <div class="relative group flex items-start"><p><strong>Yes</strong>, in safe code.</p></div>
    "#;
    let conversation = scrape_conversation(html, &Options::default());
    assert_eq!(conversation.counts(), (1, 1));
    assert_eq!(conversation.messages()[1].text, "**Yes**, in safe code.");
}

#[test]
fn test_generic_message_pattern() {
    let html = r#"
        <div class="chat-row" data-sender-type="user">What is a closure in Rust?</div>
        <div class="chat-row" data-sender-type="assistant"><p>An anonymous function that captures its environment.</p></div>
        <div class="chat-row">And how is it typed then?</div>
    "#;
    let conversation = scrape_conversation(html, &Options::default());
    let speakers: Vec<_> = conversation.messages().iter().map(|m| m.speaker).collect();
    // The ambiguous third row takes the running role: the assistant's
    assert_eq!(speakers, vec![Speaker::User, Speaker::Assistant, Speaker::Assistant]);
}

#[test]
fn test_alternating_paragraph_fallback() {
    let html = "<p>What is the speed of light?</p><p>About 299,792 kilometres per second.</p>";
    let markdown = scrape(html);
    assert!(markdown.contains(
        "## User\n\n> What is the speed of light?\n\n## Grok\n\nAbout 299,792 kilometres per second.\n\n"
    ));
}

#[test]
fn test_custom_headings_and_no_instructions() {
    let options = Options {
        user_heading: "Human".to_string(),
        assistant_heading: "Assistant".to_string(),
        include_instructions: false,
        ..Options::default()
    };
    let html = r#"
        <div class="items-end group flex flex-col">Hello there</div>
        <div class="items-start group flex flex-col">Hi!</div>
    "#;
    let markdown = scrape_with_options(html, &options);
    assert!(markdown.contains("## Human\n\n> Hello there\n\n## Assistant\n\nHi!\n\n"));
    assert!(!markdown.contains("## Instructions for Grok"));
}
