//! Root page handler - tag comparison dashboard

use axum::response::{Html, IntoResponse};

/// GET /
///
/// Comparison dashboard. Everything below the header is filled in by
/// `comparison.js`.
pub async fn root_page() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_profile = env!("BUILD_PROFILE");
    let build_timestamp = env!("BUILD_TIMESTAMP");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Pearl Manuscript Tag Comparison</title>
    <link rel="stylesheet" href="/static/pearl-ui.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>Pearl Manuscript Tag Comparison</h1>
                <p class="subtitle">Word-type and POS-tag distributions across the four poems</p>
            </div>
            <div class="header-right">
                <div class="build-info-line">pearl-analyzer v{version}</div>
                <div class="build-info-line">{git_hash} ({build_profile})</div>
                <div class="build-info-line">{build_timestamp}</div>
            </div>
        </div>
    </header>
    <div class="content">
        <section class="controls">
            <button id="run-analysis" class="button">Run Analysis</button>
            <span id="run-status" class="status"></span>
        </section>

        <section class="controls">
            <fieldset>
                <legend>Category</legend>
                <label><input type="radio" name="category" value="word_type" checked> Word Type</label>
                <label><input type="radio" name="category" value="pos_tag"> POS Tag</label>
            </fieldset>
            <fieldset id="poem-select">
                <legend>Poems</legend>
            </fieldset>
            <fieldset>
                <legend>Chart</legend>
                <label><input type="radio" name="chart" value="bar" checked> Bar</label>
                <label><input type="radio" name="chart" value="pie"> Pie</label>
                <label><input type="radio" name="chart" value="radar"> Radar</label>
            </fieldset>
        </section>

        <section id="chart-area"></section>

        <section class="downloads">
            <a id="download-tokens" class="button" href="/api/export/tokens.csv">Download Tokens CSV</a>
            <a id="download-comparison" class="button" href="/api/export/comparison.csv?category=word_type">Download Comparison CSV</a>
        </section>
    </div>
    <script src="/static/comparison.js"></script>
</body>
</html>"#
    ))
}
