//! LabHub CLI - operational surface for the progress & moderation engine.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;

use labhub_core::{
    Actor, Comment, CommentId, Lab, LabId, Post, PostId, ProgressId, ProgressStatus, ReportId,
    ReportReason, ReportStatus, ReportTarget, UserId,
};
use labhub_moderation::{BasicReportService, ReportService};
use labhub_progress::{BasicProgressTracker, ProgressTracker};
use labhub_storage::{JsonStorage, Storage};

#[derive(Parser)]
#[command(name = "labhub")]
#[command(about = "Lab progress tracking and content moderation", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, default_value = ".labhub")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage labs
    Lab {
        #[command(subcommand)]
        command: LabCommands,
    },
    /// Manage posts and comments
    Content {
        #[command(subcommand)]
        command: ContentCommands,
    },
    /// Track lab progress
    Progress {
        #[command(subcommand)]
        command: ProgressCommands,
    },
    /// Handle content reports
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Subcommand)]
enum LabCommands {
    /// Add a new lab
    Add {
        /// Lab title
        title: String,
        /// Creating user
        #[arg(long)]
        user: UserId,
        /// Publish immediately
        #[arg(long)]
        publish: bool,
    },
    /// List labs
    List,
    /// Show a lab with its aggregates
    Show {
        /// Lab ID
        id: LabId,
    },
    /// Publish a lab
    Publish {
        /// Lab ID
        id: LabId,
    },
    /// Record one view of a lab
    View {
        /// Lab ID
        id: LabId,
    },
}

#[derive(Subcommand)]
enum ContentCommands {
    /// Add a post
    AddPost {
        /// Post title
        title: String,
        /// Author
        #[arg(long)]
        author: UserId,
    },
    /// Add a comment to a post
    AddComment {
        /// Post ID
        #[arg(long)]
        post: PostId,
        /// Author
        #[arg(long)]
        author: UserId,
    },
    /// Show a post's moderation summary
    ShowPost {
        /// Post ID
        id: PostId,
    },
    /// Show a comment's moderation summary
    ShowComment {
        /// Comment ID
        id: CommentId,
    },
}

#[derive(Subcommand)]
enum ProgressCommands {
    /// Start a lab
    Start {
        /// Lab ID
        #[arg(long)]
        lab: LabId,
        /// Acting user
        #[arg(long)]
        user: UserId,
        /// Act with admin privileges
        #[arg(long)]
        admin: bool,
    },
    /// Update progress on a started lab
    Update {
        /// Lab ID
        #[arg(long)]
        lab: LabId,
        /// Acting user
        #[arg(long)]
        user: UserId,
        /// Completion percentage (0-100)
        #[arg(long)]
        percentage: u8,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
        /// Minutes spent since the last update
        #[arg(long, default_value = "0")]
        minutes: u32,
    },
    /// Abandon a lab
    Abandon {
        /// Progress record ID
        #[arg(long)]
        id: ProgressId,
        /// Acting user
        #[arg(long)]
        user: UserId,
    },
    /// Resume an abandoned lab
    Resume {
        /// Progress record ID
        #[arg(long)]
        id: ProgressId,
        /// Acting user
        #[arg(long)]
        user: UserId,
    },
    /// Reset a lab back to not-started
    Reset {
        /// Progress record ID
        #[arg(long)]
        id: ProgressId,
        /// Acting user
        #[arg(long)]
        user: UserId,
    },
    /// Delete a progress record
    Delete {
        /// Progress record ID
        #[arg(long)]
        id: ProgressId,
        /// Acting user
        #[arg(long)]
        user: UserId,
        /// Act with admin privileges
        #[arg(long)]
        admin: bool,
    },
    /// List a user's progress records
    List {
        /// User ID
        #[arg(long)]
        user: UserId,
        /// Filter by status
        #[arg(long)]
        status: Option<ProgressStatus>,
    },
    /// Show statistics (user, lab, or global)
    Stats {
        /// Statistics for one user
        #[arg(long)]
        user: Option<UserId>,
        /// Statistics for one lab
        #[arg(long)]
        lab: Option<LabId>,
    },
    /// Show leaderboards
    Leaderboard {
        /// Rank by total time instead of completions
        #[arg(long)]
        by_time: bool,
        /// Number of entries
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// File a report against a post, comment, or user
    Create {
        /// Reporting user
        #[arg(long)]
        user: UserId,
        /// Reported post
        #[arg(long, conflicts_with_all = ["comment", "reported_user"])]
        post: Option<PostId>,
        /// Reported comment
        #[arg(long, conflicts_with = "reported_user")]
        comment: Option<CommentId>,
        /// Reported user
        #[arg(long)]
        reported_user: Option<UserId>,
        /// Reason
        #[arg(long)]
        reason: ReportReasonArg,
        /// Additional details
        #[arg(long)]
        details: Option<String>,
    },
    /// Move a pending report under review
    Review {
        /// Report ID
        #[arg(long)]
        id: ReportId,
        /// Acting admin
        #[arg(long)]
        admin: UserId,
    },
    /// Resolve a report
    Resolve {
        /// Report ID
        #[arg(long)]
        id: ReportId,
        /// Acting admin
        #[arg(long)]
        admin: UserId,
        /// Resolution text
        #[arg(long)]
        notes: String,
    },
    /// Dismiss a report
    Dismiss {
        /// Report ID
        #[arg(long)]
        id: ReportId,
        /// Acting admin
        #[arg(long)]
        admin: UserId,
        /// Dismissal reason
        #[arg(long)]
        notes: String,
    },
    /// Escalate a report
    Escalate {
        /// Report ID
        #[arg(long)]
        id: ReportId,
        /// Acting admin
        #[arg(long)]
        admin: UserId,
        /// Escalation notes
        #[arg(long)]
        notes: String,
    },
    /// Apply one action to several reports
    Batch {
        /// Report IDs
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<ReportId>,
        /// Action: resolve, dismiss, or escalate
        #[arg(long)]
        action: String,
        /// Acting admin
        #[arg(long)]
        admin: UserId,
        /// Notes applied to every report
        #[arg(long)]
        notes: String,
    },
    /// Resolve a report and delete the reported content
    RemoveContent {
        /// Report ID
        #[arg(long)]
        id: ReportId,
        /// Acting admin
        #[arg(long)]
        admin: UserId,
        /// Resolution text
        #[arg(long)]
        notes: String,
    },
    /// List reports
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<ReportStatusArg>,
        /// Filter by reporting user
        #[arg(long)]
        reporter: Option<UserId>,
    },
    /// Show report statistics
    Stats,
}

/// clap-friendly wrapper around [`ReportReason`].
#[derive(Clone)]
struct ReportReasonArg(ReportReason);

impl std::str::FromStr for ReportReasonArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// clap-friendly wrapper around [`ReportStatus`].
#[derive(Clone)]
struct ReportStatusArg(ReportStatus);

impl std::str::FromStr for ReportStatusArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

fn print_record(record: &labhub_core::ProgressRecord) {
    println!(
        "  {} | {} | {:>3}% | {:>5} min | lab {}",
        record.id, record.status, record.completion_percentage, record.time_spent_minutes,
        record.lab_id,
    );
}

fn print_report(report: &labhub_core::Report) {
    println!(
        "  {} | {} | {} | {} | by {}",
        report.id, report.status, report.reason, report.target, report.reported_by,
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // One shared storage handle behind both services
    let storage = JsonStorage::new(&cli.data_dir).await?;
    let storage = Arc::new(Mutex::new(storage));
    let tracker = BasicProgressTracker::from_shared(Arc::clone(&storage));
    let reports = BasicReportService::from_shared(Arc::clone(&storage));

    match cli.command {
        Commands::Lab { command } => match command {
            LabCommands::Add {
                title,
                user,
                publish,
            } => {
                let mut lab = Lab::new(title, user);
                lab.is_published = publish;
                storage.lock().await.save_lab(&lab).await?;
                println!("Added lab: {} - {}", lab.id, lab.title);
            }
            LabCommands::List => {
                let labs = storage.lock().await.list_labs().await?;
                println!("Labs ({})", labs.len());
                for lab in labs {
                    println!(
                        "  {} | {} | published: {} | views: {} | completions: {}",
                        lab.id, lab.title, lab.is_published, lab.view_count, lab.completion_count,
                    );
                }
            }
            LabCommands::Show { id } => {
                let Some(lab) = storage.lock().await.load_lab(id).await? else {
                    println!("Lab not found");
                    return Ok(());
                };
                println!("Lab: {}", lab.id);
                println!("  Title: {}", lab.title);
                println!("  Published: {}", lab.is_published);
                println!("  Views: {}", lab.view_count);
                println!("  Completions: {}", lab.completion_count);
                println!("  Completion rate: {:.1}%", lab.completion_rate());
            }
            LabCommands::Publish { id } => {
                let mut guard = storage.lock().await;
                let mut lab = guard
                    .load_lab(id)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Lab not found"))?;
                lab.is_published = true;
                guard.save_lab(&lab).await?;
                println!("Published lab: {}", lab.id);
            }
            LabCommands::View { id } => {
                let lab = tracker.counters().record_view(id).await?;
                println!("Lab {} now has {} views", lab.id, lab.view_count);
            }
        },
        Commands::Content { command } => match command {
            ContentCommands::AddPost { title, author } => {
                let post = Post::new(author, title);
                storage.lock().await.save_post(&post).await?;
                println!("Added post: {} - {}", post.id, post.title);
            }
            ContentCommands::AddComment { post, author } => {
                let comment = Comment::new(post, author);
                storage.lock().await.save_comment(&comment).await?;
                println!("Added comment: {}", comment.id);
            }
            ContentCommands::ShowPost { id } => {
                let Some(post) = storage.lock().await.load_post(id).await? else {
                    println!("Post not found");
                    return Ok(());
                };
                println!("Post: {}", post.id);
                println!("  Title: {}", post.title);
                println!("  Reported: {}", post.is_reported);
                println!("  Active reports: {}", post.report_count);
            }
            ContentCommands::ShowComment { id } => {
                let Some(comment) = storage.lock().await.load_comment(id).await? else {
                    println!("Comment not found");
                    return Ok(());
                };
                println!("Comment: {}", comment.id);
                println!("  Post: {}", comment.post_id);
                println!("  Reported: {}", comment.is_reported);
                println!("  Active reports: {}", comment.report_count);
            }
        },
        Commands::Progress { command } => match command {
            ProgressCommands::Start { lab, user, admin } => {
                let actor = if admin {
                    Actor::admin(user)
                } else {
                    Actor::member(user)
                };
                let record = tracker.start_lab(actor, lab).await?;
                println!("Started: {} ({})", record.id, record.status);
            }
            ProgressCommands::Update {
                lab,
                user,
                percentage,
                notes,
                minutes,
            } => {
                let record = tracker
                    .update_progress(Actor::member(user), lab, percentage, notes, minutes)
                    .await?;
                println!(
                    "Updated: {} -> {}% ({})",
                    record.id, record.completion_percentage, record.status,
                );
            }
            ProgressCommands::Abandon { id, user } => {
                let record = tracker.abandon_lab(Actor::member(user), id).await?;
                println!("Abandoned: {} ({})", record.id, record.status);
            }
            ProgressCommands::Resume { id, user } => {
                let record = tracker.resume_lab(Actor::member(user), id).await?;
                println!("Resumed: {} ({})", record.id, record.status);
            }
            ProgressCommands::Reset { id, user } => {
                let record = tracker.reset_progress(Actor::member(user), id).await?;
                println!("Reset: {} ({})", record.id, record.status);
            }
            ProgressCommands::Delete { id, user, admin } => {
                let actor = if admin {
                    Actor::admin(user)
                } else {
                    Actor::member(user)
                };
                tracker.delete_progress(actor, id).await?;
                println!("Deleted progress record {id}");
            }
            ProgressCommands::List { user, status } => {
                let records = match status {
                    Some(status) => tracker.list_for_user_by_status(user, status).await?,
                    None => tracker.list_for_user(user).await?,
                };
                println!("Progress records ({})", records.len());
                for record in &records {
                    print_record(record);
                }
            }
            ProgressCommands::Stats { user, lab } => match (user, lab) {
                (Some(user), _) => {
                    let stats = tracker.user_statistics(user).await?;
                    println!("User {user}");
                    println!("  Started: {}", stats.total_started);
                    println!("  Completed: {}", stats.completed);
                    println!("  In progress: {}", stats.in_progress);
                    println!("  Abandoned: {}", stats.abandoned);
                    println!("  Time spent: {} min", stats.total_time_minutes);
                    println!("  Avg completion: {:.1}%", stats.average_completion);
                    println!("  Completion rate: {:.1}%", stats.completion_rate());
                }
                (None, Some(lab)) => {
                    let stats = tracker.lab_statistics(lab).await?;
                    println!("Lab {lab}");
                    println!("  Users: {}", stats.total_users);
                    println!("  Completions: {}", stats.completions);
                    println!("  Completion rate: {:.1}%", stats.completion_rate);
                    println!("  Avg time: {:.1} min", stats.average_time_minutes);
                    println!("  Avg completion: {:.1}%", stats.average_completion);
                }
                (None, None) => {
                    let stats = tracker.global_statistics().await?;
                    println!("Global progress");
                    println!("  Records: {}", stats.total_records);
                    println!("  Completed: {}", stats.completed);
                    println!("  In progress: {}", stats.in_progress);
                    println!("  Abandoned: {}", stats.abandoned);
                    println!("  Active this week: {}", stats.recent_activity);
                }
            },
            ProgressCommands::Leaderboard { by_time, limit } => {
                if by_time {
                    for entry in tracker.time_leaderboard(limit).await? {
                        println!("  {} | {} min", entry.user_id, entry.total_minutes);
                    }
                } else {
                    for entry in tracker.completion_leaderboard(limit).await? {
                        println!("  {} | {} labs", entry.user_id, entry.completed_labs);
                    }
                }
            }
        },
        Commands::Report { command } => match command {
            ReportCommands::Create {
                user,
                post,
                comment,
                reported_user,
                reason,
                details,
            } => {
                let target = match (post, comment, reported_user) {
                    (Some(id), None, None) => ReportTarget::Post(id),
                    (None, Some(id), None) => ReportTarget::Comment(id),
                    (None, None, Some(id)) => ReportTarget::User(id),
                    _ => anyhow::bail!(
                        "exactly one of --post, --comment, --reported-user is required"
                    ),
                };
                let report = reports
                    .create_report(Actor::member(user), target, reason.0, details)
                    .await?;
                println!("Filed report: {} against {}", report.id, report.target);
            }
            ReportCommands::Review { id, admin } => {
                let report = reports.begin_review(Actor::admin(admin), id).await?;
                println!("Report {} is now {}", report.id, report.status);
            }
            ReportCommands::Resolve { id, admin, notes } => {
                let report = reports
                    .resolve_report(Actor::admin(admin), id, notes)
                    .await?;
                println!("Report {} is now {}", report.id, report.status);
            }
            ReportCommands::Dismiss { id, admin, notes } => {
                let report = reports
                    .dismiss_report(Actor::admin(admin), id, notes)
                    .await?;
                println!("Report {} is now {}", report.id, report.status);
            }
            ReportCommands::Escalate { id, admin, notes } => {
                let report = reports
                    .escalate_report(Actor::admin(admin), id, notes)
                    .await?;
                println!("Report {} is now {}", report.id, report.status);
            }
            ReportCommands::Batch {
                ids,
                action,
                admin,
                notes,
            } => {
                let processed = reports
                    .batch_action(Actor::admin(admin), &ids, &action, notes)
                    .await?;
                println!("{processed} reports processed");
            }
            ReportCommands::RemoveContent { id, admin, notes } => {
                let report = reports
                    .remove_reported_content(Actor::admin(admin), id, notes)
                    .await?;
                println!(
                    "Report {} resolved and {} removed",
                    report.id,
                    report.target.kind(),
                );
            }
            ReportCommands::List { status, reporter } => {
                let list = match (status, reporter) {
                    (Some(status), _) => reports.reports_by_status(status.0).await?,
                    (None, Some(reporter)) => reports.reports_by_reporter(reporter).await?,
                    (None, None) => reports.pending_reports().await?,
                };
                println!("Reports ({})", list.len());
                for report in &list {
                    print_report(report);
                }
            }
            ReportCommands::Stats => {
                let stats = reports.statistics().await?;
                println!("Reports");
                println!("  Total: {}", stats.total);
                println!("  Pending: {}", stats.pending);
                println!("  Under review: {}", stats.under_review);
                println!("  Resolved: {}", stats.resolved);
                println!("  Dismissed: {}", stats.dismissed);
                println!("  Escalated: {}", stats.escalated);
                println!("  Resolution rate: {:.1}%", stats.resolution_rate());

                let period = reports.period_statistics().await?;
                println!("  This week: {}", period.reports_this_week);
                println!("  This month: {}", period.reports_this_month);
            }
        },
    }

    Ok(())
}
