//! # Board Application Controller
//!
//! The controller wires the feed to the event bus and maps command-line
//! requests onto named board events. Board events are queued through the
//! bus and applied in order; the view events the feed emits in response are
//! published back on the bus for whatever presents them.

use crate::board::{
    composer::Composer,
    error::BoardError,
    events::{BoardEvent, EventBus, SimpleEventBus, ViewEventHandler},
    markup::encode,
    models::{Catalog, FileLikeLedger, MediaReference, MediaType, PostId},
    services::{FeedStore, HttpDocumentStore},
    view_models::{now_seconds, FeedRenderer},
};
use crate::cmd_args::BoardCommand;
use crate::config::BoardProfile;
use anyhow::{bail, Context, Result};
use std::sync::{Arc, Mutex};

type EventQueue = Arc<Mutex<Vec<BoardEvent>>>;

/// Orchestrates the feed view model and the event bus
pub struct AppController {
    feed: FeedRenderer,
    event_bus: SimpleEventBus,
    queued_events: EventQueue,
}

impl AppController {
    /// Create a controller around an already configured feed
    pub fn new(feed: FeedRenderer) -> Self {
        let mut event_bus = SimpleEventBus::new();
        let queued_events: EventQueue = Arc::new(Mutex::new(Vec::new()));

        let sink = queued_events.clone();
        event_bus.subscribe_to_board_events(Box::new(move |event| {
            if let Ok(mut queue) = sink.lock() {
                queue.push(event.clone());
            }
        }));

        Self {
            feed,
            event_bus,
            queued_events,
        }
    }

    /// Build the feed from a profile: HTTP store, like ledger and catalog
    pub fn from_profile(profile: &BoardProfile) -> Result<Self> {
        let store = HttpDocumentStore::new(profile.store_url()?)
            .context("Failed to create document store client")?;
        let ledger = FileLikeLedger::open(profile.likes()).with_context(|| {
            format!("Failed to open like ledger {}", profile.likes().display())
        })?;
        let catalog = load_catalog(profile)?;

        let feed = FeedRenderer::new(
            FeedStore::new(Arc::new(store)),
            Box::new(ledger),
            Arc::new(catalog),
        )
        .with_posts_limit(profile.posts_limit());
        tracing::info!("Controller ready for {}", profile.store_url()?);
        Ok(Self::new(feed))
    }

    /// Display name used for posts and comments
    pub fn set_author(&mut self, author: &str) {
        self.feed.composer_mut().set_author(author);
    }

    pub fn subscribe_to_view_events(&mut self, handler: ViewEventHandler) {
        self.event_bus.subscribe_to_view_events(handler);
    }

    pub fn feed(&self) -> &FeedRenderer {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut FeedRenderer {
        &mut self.feed
    }

    /// Publish a board event; it is applied by the next `process_events`
    pub fn dispatch(&mut self, event: BoardEvent) {
        self.event_bus.publish_board_event(event);
    }

    /// Apply queued board events in order, then publish resulting view events.
    ///
    /// Stops at the first failure. The feed has already turned that failure
    /// into notices or an error panel by then.
    pub async fn process_events(&mut self) -> Result<()> {
        loop {
            let next = self
                .queued_events
                .lock()
                .ok()
                .and_then(|mut queue| (!queue.is_empty()).then(|| queue.remove(0)));
            let Some(event) = next else {
                break;
            };

            let result = self.feed.handle_event(&event).await;
            self.feed.poll_mutations();
            self.flush_view_events();
            result.with_context(|| format!("Failed to handle {event:?}"))?;
        }
        Ok(())
    }

    /// Wait for outstanding counter writes and publish their effects
    pub async fn settle(&mut self) -> usize {
        let settled = self.feed.settle_mutations().await;
        self.flush_view_events();
        settled
    }

    fn flush_view_events(&mut self) {
        for event in self.feed.collect_pending_view_events() {
            self.event_bus.publish_view_event(event);
        }
    }

    /// Run one command against the board and return its printable output
    pub async fn run(&mut self, command: &BoardCommand) -> Result<String> {
        let now = now_seconds();
        match command {
            BoardCommand::Feed { limit, html } => {
                if let Some(limit) = limit {
                    self.feed.set_posts_limit(*limit);
                }
                self.reload().await?;
                Ok(if *html {
                    self.feed.render_feed(now)
                } else {
                    self.feed.render_text(now)
                })
            }
            BoardCommand::Post { text, media } => {
                if text.trim().is_empty() && media.is_none() {
                    bail!("Nothing to post");
                }
                self.feed.composer_mut().set_text(text);
                if let Some(spec) = media {
                    self.attach_media(spec)?;
                }
                self.dispatch(BoardEvent::PostSubmitRequested);
                self.process_events().await?;
                Ok(self.feed.render_text(now))
            }
            BoardCommand::Like { post_id } => {
                let post_id = self.find_post(post_id).await?;
                let already = self
                    .feed
                    .entry(&post_id)
                    .map(|entry| entry.liked)
                    .unwrap_or(false);
                if already {
                    return Ok(format!("Already liked {post_id}"));
                }

                self.dispatch(BoardEvent::LikeClicked {
                    post_id: post_id.clone(),
                });
                self.process_events().await?;
                self.settle().await;

                match self.feed.entry(&post_id) {
                    Some(entry) if entry.liked => {
                        Ok(format!("Liked {} ({} likes)", post_id, entry.post.like_count))
                    }
                    _ => bail!("Could not save your like on {post_id}"),
                }
            }
            BoardCommand::Comments { post_id, html } => {
                let post_id = self.find_post(post_id).await?;
                self.dispatch(BoardEvent::CommentToggleRequested { post_id });
                self.process_events().await?;
                Ok(if *html {
                    self.feed.render_feed(now)
                } else {
                    self.feed.render_text(now)
                })
            }
            BoardCommand::Comment { post_id, text } => {
                if text.trim().is_empty() {
                    bail!("Nothing to send");
                }
                let post_id = self.find_post(post_id).await?;
                self.dispatch(BoardEvent::CommentToggleRequested {
                    post_id: post_id.clone(),
                });
                self.process_events().await?;

                // Thread composers inherit the author from the post composer
                self.feed
                    .thread_composer_mut(&post_id)
                    .ok_or_else(|| {
                        BoardError::Validation(format!("Comments for {post_id} are not open"))
                    })?
                    .set_text(text);

                self.dispatch(BoardEvent::CommentSubmitRequested {
                    post_id: post_id.clone(),
                });
                self.process_events().await?;
                self.settle().await;
                Ok(self.feed.render_text(now))
            }
            BoardCommand::Search { .. } | BoardCommand::Preview { .. } => {
                run_offline(command, self.feed.catalog().clone())
            }
        }
    }

    async fn reload(&mut self) -> Result<()> {
        self.dispatch(BoardEvent::FeedReloadRequested);
        self.process_events().await
    }

    /// Load the feed and make sure `raw` is one of its posts
    async fn find_post(&mut self, raw: &str) -> Result<PostId> {
        self.reload().await?;
        let post_id = PostId::new(raw);
        if self.feed.entry(&post_id).is_none() {
            bail!("Post {} is not among the latest posts", post_id);
        }
        Ok(post_id)
    }

    /// Insert the first catalog match for `TYPE:QUERY` at the caret
    fn attach_media(&mut self, spec: &str) -> Result<()> {
        let (media_type, query) = parse_media_spec(spec)?;
        let composer = self.feed.composer_mut();
        if !composer.text().is_empty() && !composer.text().ends_with(char::is_whitespace) {
            composer.insert_at_cursor(" ");
        }
        composer.open_media_panel();
        composer.choose_media_type(media_type);
        if composer.search_media(query).is_empty() {
            composer.close_media_panel();
            bail!("No {} in the catalog matches '{}'", media_type.label(), query);
        }
        composer
            .select_media_result(0)
            .context("Catalog search returned no selectable result")?;
        Ok(())
    }
}

fn load_catalog(profile: &BoardProfile) -> Result<Catalog> {
    match profile.catalog() {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => {
            tracing::debug!("No catalog configured; media search is empty");
            Ok(Catalog::default())
        }
    }
}

/// Split `TYPE:QUERY`
pub fn parse_media_spec(spec: &str) -> Result<(MediaType, &str)> {
    let Some((raw_type, query)) = spec.split_once(':') else {
        bail!("Expected TYPE:QUERY, got '{}'", spec);
    };
    let media_type = raw_type
        .trim()
        .parse::<MediaType>()
        .map_err(anyhow::Error::msg)?;
    Ok((media_type, query.trim()))
}

/// Commands that only need the local catalog and the markup engine
pub fn run_offline(command: &BoardCommand, catalog: Arc<Catalog>) -> Result<String> {
    let mut composer = Composer::new(catalog);
    match command {
        BoardCommand::Search { media_type, query } => {
            composer.open_media_panel();
            composer.choose_media_type(*media_type);
            let results = composer.search_media(query).to_vec();
            if results.is_empty() {
                return Ok("No results found.".to_string());
            }
            Ok(results
                .iter()
                .map(|item| format!("{}\t{}", item.title, encode(&MediaReference::from(item))))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        BoardCommand::Preview { text } => {
            composer.set_text(text);
            composer.toggle_tab();
            Ok(composer.preview().into_string())
        }
        other => bail!("{:?} needs the document store", other),
    }
}
