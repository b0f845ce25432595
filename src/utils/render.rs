use crate::models::post::Post;
use crate::models::user::UserProfile;

/// Renders the public profile page: who the user is, followed by their posts,
/// newest first. Pure function from data to markup, no template engine.
pub fn render_profile(user: &UserProfile, posts: &[Post]) -> String {
    let mut html = String::with_capacity(1024);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!(
        "<title>{} {}</title>\n",
        escape(&user.name),
        escape(&user.surname)
    ));
    html.push_str("<meta charset=\"utf-8\">\n</head>\n<body>\n");

    html.push_str(&format!(
        "<h1>{} {} (@{})</h1>\n",
        escape(&user.name),
        escape(&user.surname),
        escape(&user.username)
    ));
    html.push_str("<ul class=\"profile\">\n");
    for (label, value) in [
        ("Email", &user.email),
        ("Phone", &user.phone_number),
        ("Birthday", &user.birthday),
        ("City", &user.city),
    ] {
        if !value.is_empty() {
            html.push_str(&format!("<li>{label}: {}</li>\n", escape(value)));
        }
    }
    html.push_str("</ul>\n");

    html.push_str("<h2>Posts</h2>\n");
    if posts.is_empty() {
        html.push_str("<p>No posts yet.</p>\n");
    } else {
        for post in posts {
            html.push_str("<article class=\"post\">\n");
            html.push_str(&format!("<h3>{}</h3>\n", escape(&post.title)));
            html.push_str(&format!("<p>{}</p>\n", escape(&post.main_text)));
            html.push_str("</article>\n");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Minimal HTML escaping. Post bodies are user input; without this, a post
/// titled `<script>...` would run in every visitor's browser.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserProfile {
        UserProfile {
            id: 1,
            username: "alice".into(),
            name: "Alice".into(),
            surname: "Smith".into(),
            email: "alice@example.com".into(),
            phone_number: "".into(),
            birthday: "1990-01-01".into(),
            city: "Lisbon".into(),
        }
    }

    #[test]
    fn renders_user_and_posts() {
        let posts = vec![Post {
            id: 1,
            user_id: 1,
            title: "hello".into(),
            main_text: "first post".into(),
            created_at: 0,
        }];
        let html = render_profile(&sample_user(), &posts);
        assert!(html.contains("Alice Smith (@alice)"));
        assert!(html.contains("<h3>hello</h3>"));
        assert!(html.contains("first post"));
        // Empty profile fields are skipped entirely.
        assert!(!html.contains("Phone:"));
    }

    #[test]
    fn escapes_user_input() {
        let posts = vec![Post {
            id: 1,
            user_id: 1,
            title: "<script>alert(1)</script>".into(),
            main_text: "a & b".into(),
            created_at: 0,
        }];
        let html = render_profile(&sample_user(), &posts);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }
}
