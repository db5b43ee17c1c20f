//! Initialize a new blog site

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::Path;

use crate::config::{BlogSettings, CONFIG_FILE};
use crate::Site;

const POST_TEMPLATE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <title>@*TITLE*@ - @*SITE_NAME*@</title>
    <meta name="description" content="@*SUBTITLE*@" />
    <link rel="alternate" type="application/rss+xml" href="/feed.xml" />
    @*HEADER_LINKS*@
</head>
<body>
    <header>
        <a href="/">@*SITE_TITLE*@</a>
        <nav>@*PAGE_NAV*@</nav>
    </header>
    <main>
        <article>
            <h1>@*TITLE*@</h1>
            <h2>@*SUBTITLE*@</h2>
            <p>@*AUTHOR*@ &middot; <time datetime="@*PUBLISHED_DATE_yyyy-MM-ddTHH:mm:ssZ*@">@*PUBLISHED_DATE_MMM dd, yyyy*@</time></p>
            @*CONTENT*@
        </article>
        <aside>@*NAV*@</aside>
    </main>
    @*SCRIPTS*@
</body>
</html>
"#;

const PAGE_TEMPLATE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <title>@*TITLE*@ - @*SITE_NAME*@</title>
    <meta name="description" content="@*SITE_DESCRIPTION*@" />
    <link rel="alternate" type="application/rss+xml" href="/feed.xml" />
    @*HEADER_LINKS*@
</head>
<body>
    <header>
        <a href="/">@*SITE_TITLE*@</a>
        <nav>@*PAGE_NAV*@</nav>
    </header>
    <main>
        @*CONTENT*@
        <aside>@*NAV*@</aside>
    </main>
    @*SCRIPTS*@
</body>
</html>
"#;

const POST_TEMPLATE_RAZOR: &str = r#"@page "@*URL*@"

<PageTitle>@*TITLE*@</PageTitle>

<article>
    <h1>@*TITLE*@</h1>
    <h2>@*SUBTITLE*@</h2>
    <p>@*AUTHOR*@ &middot; <time datetime="@*PUBLISHED_DATE_yyyy-MM-ddTHH:mm:ssZ*@">@*PUBLISHED_DATE_MMM dd, yyyy*@</time></p>
    @*CONTENT*@
</article>
"#;

const PAGE_TEMPLATE_RAZOR: &str = r#"@page "/@*URL*@"
@attribute [NavOrder(@*NAV_ORDER*@)]

<PageTitle>@*TITLE*@</PageTitle>

@*CONTENT*@
"#;

/// Initialize a new site in the given directory
///
/// Existing files are left untouched, so running this over a site only adds
/// what is missing.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let settings = BlogSettings::default();
    let config_path = target_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        let yaml = serde_yaml::to_string(&settings)?;
        fs::write(&config_path, format!("# blogweave configuration\n{}", yaml))?;
    }

    let site = Site::with_settings(target_dir, settings);
    for dir in [&site.posts_dir, &site.pages_dir, &site.templates_dir, &site.web_root] {
        fs::create_dir_all(dir)?;
    }

    let today = chrono::Local::now().date_naive();
    let files = [
        (site.templates_dir.join("PostTemplate.html"), POST_TEMPLATE_HTML.to_string()),
        (site.templates_dir.join("PageTemplate.html"), PAGE_TEMPLATE_HTML.to_string()),
        (site.templates_dir.join("PostTemplate.razor"), POST_TEMPLATE_RAZOR.to_string()),
        (site.templates_dir.join("PageTemplate.razor"), PAGE_TEMPLATE_RAZOR.to_string()),
        (site.pages_dir.join("index.md"), sample_index()),
        (
            site.posts_dir.join(format!(
                "{}-{}-{}-hello-world.md",
                today.year(),
                today.month(),
                today.day()
            )),
            sample_post(today),
        ),
    ];

    for (path, contents) in files {
        if path.exists() {
            tracing::debug!("Keeping existing {:?}", path);
            continue;
        }
        fs::write(&path, contents)?;
        tracing::debug!("Created {:?}", path);
    }

    Ok(())
}

fn sample_index() -> String {
    r#"---
title: Home
navorder: 0
---

# Welcome

Posts live in the posts folder, pages like this one in the pages folder.
"#
    .to_string()
}

fn sample_post(date: NaiveDate) -> String {
    format!(
        r#"---
title: Hello World
subtitle: The first post, written {}
author: Me
---

This is your very first post. Write Markdown as usual; an `@` in prose is kept as is.

## Sample code

```rust
fn main() {{
    println!("Hello, world!");
}}
```

## Embedded component

The block below is rendered on its own and mounted where it stands:

```blazor-component counter
<button class="counter">Count</button>
```
"#,
        date.format("%B %-d, %Y")
    )
}

/// Run the init command on an existing site directory
pub fn run(site: &Site) -> Result<()> {
    init_site(&site.base_dir)
}
