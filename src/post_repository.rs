use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use spdlog::{debug, info, warn};

use crate::content::content_renderer::{PostRenderer, Rendered};
use crate::content::parsing_utils::UNCATEGORIZED;
use crate::content::Status;
use crate::error::{RenderError, RepositoryError};
use crate::media_index::MediaIndex;
use crate::post::Post;
use crate::post_list::PostList;
use crate::post_search;
use crate::text_utils::{month_start, year_start};

/// Name of a tag or category and in how many places it shows up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub name: String,
    pub count: usize,
}

/// All the posts of a folder, newest first, plus the year and month indexes
/// derived from them.
pub struct PostRepository {
    folder: PathBuf,
    posts: Vec<Post>,
    years: Vec<NaiveDate>,
    months: Vec<NaiveDate>,
    media: MediaIndex,
    renderer: PostRenderer,
}

impl PostRepository {
    /// Reads every post file of the folder. Files that do not parse are logged
    /// and left out; failing to read the folder itself, or a broken media
    /// descriptor, is an error.
    pub fn load(folder: &Path) -> Result<PostRepository, RepositoryError> {
        let post_list = PostList::new(folder.to_path_buf());
        let files = post_list.retrieve_files().map_err(|source| RepositoryError::Io {
            path: folder.to_path_buf(),
            source,
        })?;

        let mut posts = Vec::with_capacity(files.len());
        for path in files {
            if let Some(post) = Self::load_post(&path) {
                posts.push(post);
            }
        }

        let media = MediaIndex::load(folder)?;
        let repository = Self::from_posts(folder.to_path_buf(), posts, media);
        info!("Loaded {} posts from {}", repository.total(), folder.display());
        Ok(repository)
    }

    fn load_post(path: &Path) -> Option<Post> {
        let file_name = path.file_name()?.to_str()?;
        let filecontent = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping post file={}: {}", path.display(), e);
                return None;
            }
        };

        match Post::from_string(file_name, &filecontent) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!("Skipping post file={}: {}", path.display(), e);
                None
            }
        }
    }

    /// Builds a repository from posts already in memory. Posts are sorted and
    /// the indexes built the same way `load` does it.
    pub fn from_posts(folder: PathBuf, posts: Vec<Post>, media: MediaIndex) -> PostRepository {
        let mut repository = PostRepository {
            folder,
            posts,
            years: vec![],
            months: vec![],
            media,
            renderer: PostRenderer::new(),
        };
        repository.dedup_files();
        repository.sort();
        repository.update_collections();
        repository
    }

    fn dedup_files(&mut self) {
        let mut seen = BTreeSet::new();
        self.posts.retain(|post| {
            let is_new = seen.insert(post.file.clone());
            if !is_new {
                warn!("Duplicated post file={}, keeping the first one", post.file);
            }
            is_new
        });
    }

    fn sort(&mut self) {
        // Stable, so posts created at the same time keep the file name order
        self.posts.sort_by(|a, b| b.header.creation_date.cmp(&a.header.creation_date));
    }

    /// Rebuilds the year and month indexes from the current posts.
    fn update_collections(&mut self) {
        let mut years = BTreeSet::new();
        let mut months = BTreeSet::new();
        for post in self.posts.iter() {
            years.insert(year_start(&post.header.creation_date));
            months.insert(month_start(&post.header.creation_date));
        }
        self.years = years.into_iter().rev().collect();
        self.months = months.into_iter().rev().collect();
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn total(&self) -> usize {
        self.posts.len()
    }

    /// First day of every year with posts, newest first.
    pub fn years(&self) -> &[NaiveDate] {
        &self.years
    }

    /// First day of every month with posts, newest first.
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    pub fn media(&self) -> &MediaIndex {
        &self.media
    }

    pub fn get_media_path(&self, name: &str) -> Option<&Path> {
        self.media.get_media_path(name)
    }

    /// Most recently created post. With equal dates the first one found wins.
    pub fn latest(&self) -> Option<&Post> {
        let mut newest: Option<&Post> = None;
        for post in self.posts.iter() {
            match newest {
                Some(n) if post.header.creation_date <= n.header.creation_date => {}
                _ => newest = Some(post),
            }
        }
        newest
    }

    pub fn filter<P>(&self, predicate: P) -> Vec<&Post>
        where P: Fn(&Post) -> bool
    {
        self.posts.iter().filter(|post| predicate(*post)).collect()
    }

    pub fn with_tag(&self, tag: &str) -> Vec<&Post> {
        self.filter(|post| post.header.tags.iter().any(|t| t == tag))
    }

    pub fn in_category(&self, category: &str) -> Vec<&Post> {
        self.filter(|post| post.header.categories.contains(category))
    }

    pub fn from_year(&self, year: i32) -> Vec<&Post> {
        self.filter(|post| post.year() == year)
    }

    pub fn from_month(&self, year: i32, month: u32) -> Vec<&Post> {
        self.filter(|post| post.year() == year && post.month() == month)
    }

    pub fn with_status(&self, status: Status) -> Vec<&Post> {
        self.filter(|post| post.status() == status)
    }

    /// The post published under `/{year}/{month}/{slug}`. `None` unless exactly
    /// one post matches.
    pub fn find_by_address(&self, year: i32, month: u32, slug: &str) -> Option<&Post> {
        let found = self.filter(|post| {
            post.year() == year && post.month() == month && post.header.slug.as_deref() == Some(slug)
        });
        Self::single(found, || format!("{}/{}/{}", year, month, slug))
    }

    pub fn find_by_file(&self, status: Status, file: &str) -> Option<&Post> {
        let found = self.filter(|post| post.status() == status && post.file == file);
        Self::single(found, || format!("{}/{}", status, file))
    }

    fn single<F: Fn() -> String>(found: Vec<&Post>, describe: F) -> Option<&Post> {
        if found.len() > 1 {
            warn!("{} posts match {}, refusing to pick one", found.len(), describe());
        }
        match found.as_slice() {
            [post] => Some(*post),
            _ => None,
        }
    }

    pub fn search(&self, phrase: &str) -> Vec<&Post> {
        post_search::search(&self.posts, phrase)
    }

    pub fn search_literally(&self, phrase: &str) -> Vec<&Post> {
        post_search::search_literally(&self.posts, phrase)
    }

    /// Drops every post whose status is not in `statuses`.
    pub fn keep_only(&mut self, statuses: &[Status]) {
        let before = self.posts.len();
        self.posts.retain(|post| statuses.contains(&post.status()));
        self.update_collections();
        debug!("Kept {} of {} posts with status in {:?}", self.posts.len(), before, statuses);
    }

    pub fn keep_only_published(&mut self) {
        self.keep_only(&[Status::Publish]);
    }

    /// Posts imported from an upstream blog link to it with absolute urls. This
    /// makes those links relative to this site. Cached renders are discarded.
    pub fn remove_upstream_links(&mut self, baselink: &str) {
        let baselink = baselink.trim_end_matches('/');
        if baselink.is_empty() {
            return;
        }

        let mut changed = 0;
        for post in self.posts.iter_mut() {
            if !post.filecontent.contains(baselink) {
                continue;
            }
            post.content = relative_links(&post.content, baselink);
            post.filecontent = relative_links(&post.filecontent, baselink);
            post.clear_rendered();
            changed += 1;
        }
        debug!("Removed upstream links to {} from {} posts", baselink, changed);
    }

    /// Renders the post once, returning the cached html from then on.
    pub fn render<'a>(&self, post: &'a Post) -> Result<&'a Rendered, RenderError> {
        post.render(&self.renderer)
    }

    pub fn tag_counts(&self) -> Vec<Occurrence> {
        let tags = self.posts.iter().flat_map(|post| post.header.tags.iter());
        count_occurrences(tags)
    }

    pub fn category_counts(&self) -> Vec<Occurrence> {
        let categories = self.posts.iter()
            .flat_map(|post| post.header.categories.iter())
            .filter(|category| category.as_str() != UNCATEGORIZED);
        count_occurrences(categories)
    }
}

fn relative_links(text: &str, baselink: &str) -> String {
    // A link to the upstream root becomes a link to this site root
    let with_slash = format!("{}/", baselink);
    text.replace(&with_slash, "/")
        .replace(&format!("({})", baselink), "(/)")
        .replace(&format!("<{}>", baselink), "</>")
}

/// Most frequent first, names in alphabetical order when counts are equal.
fn count_occurrences<'a, I: Iterator<Item=&'a String>>(names: I) -> Vec<Occurrence> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }

    let mut occurrences: Vec<Occurrence> = counts.into_iter()
        .map(|(name, count)| Occurrence { name: name.to_string(), count })
        .collect();
    occurrences.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    occurrences
}
