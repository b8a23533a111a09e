//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: Folio
description: Researcher, Engineer.
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
source_dir: source
public_dir: public
blog_dir: blog

# Writing
render_drafts: false
strict_links: false
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false
date_format: "%B %-d, %Y"

# Navigation
menu:
  - name: home
    path: /
  - name: about
    path: /about
  - name: blog
    path: /blog
  - name: projects
    path: /projects
  - name: advisory
    path: /advisory
"#;

const HOME: &str = r#"---
title: Home
---

I'm a researcher and engineer. Read my [writing](/blog) or
[see my work](https://github.com/).
"#;

const ABOUT: &str = r#"---
title: About
description: A little about me.
---

Write something about yourself here.
"#;

const PROJECTS: &str = r#"---
title: Projects
description: A variety of other projects I've been involved with.
---

- [A project](https://example.com)
"#;

const ADVISORY: &str = r#"---
title: Advisory
description: Consulting and advisory services.
---

### How I can help

- Evaluating and selecting technologies
- Taking prototypes to production
- Reviewing code, plans and architecture

Past work includes [open source libraries](https://github.com/) and
[published research](https://scholar.google.com/). See the [projects](/projects)
page for more.

---

To get in touch, send an email to `hello@example.com`.
"#;

const FIRST_POST: &str = r#"---
title: Hello World
publishedAt: '2024-01-01'
summary: The first post.
---

Welcome! Links to [other pages](/about) stay on the site, links to
[elsewhere](https://example.com) open in a new tab.

<Callout emoji="💡">

Callouts wrap a block of content.

</Callout>
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    let source = target_dir.join("source");
    fs::create_dir_all(source.join("_posts"))?;
    fs::create_dir_all(source.join("images"))?;

    fs::write(&config_path, CONFIG)?;
    fs::write(source.join("index.md"), HOME)?;
    fs::write(source.join("about.md"), ABOUT)?;
    fs::write(source.join("projects.md"), PROJECTS)?;
    fs::write(source.join("advisory.md"), ADVISORY)?;
    fs::write(source.join("_posts/hello-world.mdx"), FIRST_POST)?;

    tracing::info!("Initialized site in {:?}", target_dir);
    Ok(())
}
