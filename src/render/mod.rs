//! Server-side HTML rendering
//!
//! Every page is a complete document linking the shared stylesheet. All
//! post fields pass through [`escape_html`] before reaching the markup.

use std::fmt::Write;

use crate::routing::STYLESHEET_PATH;
use crate::store::Post;

/// Stylesheet served at [`STYLESHEET_PATH`]
pub const STYLESHEET: &str = include_str!("style.css");

/// Listing of every post, in collection order
pub fn index_page(posts: &[Post]) -> String {
    let mut body = String::from("<h1>Welcome to My Blog!</h1>\n");
    body.push_str("<p><a class=\"button\" href=\"/add\">Add a new post</a></p>\n");

    if posts.is_empty() {
        body.push_str("<p class=\"empty\">No posts yet.</p>\n");
    }

    for post in posts {
        let _ = write!(
            body,
            "<article class=\"post\">\n\
             <h2>{title}</h2>\n\
             <p class=\"author\">Written by {author}</p>\n\
             <p class=\"content\">{content}</p>\n\
             <p class=\"actions\"><a href=\"/update/{id}\">Update</a>\
             <a class=\"delete\" href=\"/delete/{id}\">Delete</a></p>\n\
             </article>\n",
            id = post.id,
            title = escape_html(&post.title),
            author = escape_html(&post.author),
            content = escape_html(&post.content),
        );
    }

    layout("My Blog", &body)
}

/// Blank creation form posting to `/add`
pub fn add_page() -> String {
    let body = format!(
        "<h1>Add a new post</h1>\n{}",
        post_form("/add", "", "", "", "Add post")
    );
    layout("Add post", &body)
}

/// Edit form pre-filled with `post`, posting back to `/update/{id}`
pub fn update_page(post: &Post) -> String {
    let action = format!("/update/{}", post.id);
    let body = format!(
        "<h1>Update post</h1>\n{}",
        post_form(&action, &post.author, &post.title, &post.content, "Update post")
    );
    layout("Update post", &body)
}

fn post_form(action: &str, author: &str, title: &str, content: &str, submit: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <label for=\"author\">Author</label>\n\
         <input type=\"text\" id=\"author\" name=\"author\" value=\"{author}\">\n\
         <label for=\"title\">Title</label>\n\
         <input type=\"text\" id=\"title\" name=\"title\" value=\"{title}\">\n\
         <label for=\"content\">Content</label>\n\
         <textarea id=\"content\" name=\"content\">{content}</textarea>\n\
         <button type=\"submit\">{submit}</button>\n\
         </form>\n\
         <p><a href=\"/\">Back to all posts</a></p>\n",
        author = escape_html(author),
        title = escape_html(title),
        content = escape_html(content),
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"{STYLESHEET_PATH}\">\n\
         </head>\n\
         <body>\n{body}</body>\n\
         </html>\n"
    )
}

/// Escape text for use in element content and quoted attribute values
pub fn escape_html(s: &str) -> String {
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
