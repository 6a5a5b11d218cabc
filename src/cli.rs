// src/cli.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthService;
use crate::config::PortalConfig;
use crate::core::{CredentialProvider, FileCredentialStore, PortalApi, ServiceClient};
use crate::error::{PortalError, SESSION_EXPIRED};
use crate::reconciler::{
    CandidateFilters, CandidateQuery, ExperienceRange, RequirementFilters, RequirementQuery,
    SortKey, SortOrder, SortSpec,
};
use crate::types::{
    Availability, Candidate, CandidateDraft, CandidateForm, CandidateStatus, ProfileUpdate,
    RecruiterLogin, RecruiterRegistration, Requirement, RequirementForm,
};
use crate::views::{
    CandidateBoard, JobBoard, JobTab, Notice, PendingDelete, ProfileView, RequirementBoard,
};

#[derive(Parser)]
#[command(name = "job-portal")]
#[command(about = "Recruiter and candidate client for the job portal API")]
pub struct PortalCli {
    #[command(subcommand)]
    pub command: PortalCommand,

    /// API base URL, overrides config and environment
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Credential file holding the session token
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Print lists as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum PortalCommand {
    /// Register, log in and manage the stored session
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Recruiter: manage candidates
    #[command(subcommand)]
    Candidates(CandidateCommand),
    /// Recruiter: manage job requirements
    #[command(subcommand)]
    Requirements(RequirementCommand),
    /// Candidate: browse and apply to jobs
    #[command(subcommand)]
    Jobs(JobCommand),
    /// Candidate: own profile
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Register as a candidate and store the token
    RegisterCandidate(CandidateArgs),
    /// Register as a recruiter and store the token
    RegisterRecruiter {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Recruiter login
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show the claims of the stored token
    Whoami,
}

#[derive(Subcommand)]
pub enum CandidateCommand {
    List(CandidateListArgs),
    Add(CandidateArgs),
    Edit {
        id: u64,
        #[command(flatten)]
        fields: CandidateArgs,
    },
    Delete {
        id: u64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum RequirementCommand {
    List(RequirementListArgs),
    Add(RequirementArgs),
    Edit {
        id: u64,
        #[command(flatten)]
        fields: RequirementArgs,
    },
    Delete {
        id: u64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Jobs not applied to yet
    New(RequirementListArgs),
    /// Jobs already applied to
    Applied(RequirementListArgs),
    /// Apply to a job
    Apply { id: u64 },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    Update(ProfileArgs),
    Delete {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CandidateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Comma-separated
    #[arg(long)]
    pub skills: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub experience: Option<String>,
    #[arg(long)]
    pub current_role: Option<String>,
    #[arg(long)]
    pub education: Option<String>,
    #[arg(long)]
    pub expected_salary: Option<String>,
    #[arg(long)]
    pub availability: Option<Availability>,
    #[arg(long)]
    pub status: Option<CandidateStatus>,
}

impl CandidateArgs {
    /// Overlay the given flags onto a form, leaving the rest untouched.
    pub fn apply_to(&self, form: &mut CandidateForm) {
        overlay(&mut form.name, &self.name);
        overlay(&mut form.email, &self.email);
        overlay(&mut form.contact, &self.contact);
        overlay(&mut form.city, &self.city);
        overlay(&mut form.skills, &self.skills);
        overlay(&mut form.username, &self.username);
        overlay(&mut form.password, &self.password);
        overlay(&mut form.experience, &self.experience);
        overlay(&mut form.current_role, &self.current_role);
        overlay(&mut form.education, &self.education);
        overlay(&mut form.expected_salary, &self.expected_salary);
        if let Some(availability) = self.availability {
            form.availability = availability;
        }
        if let Some(status) = self.status {
            form.status = status;
        }
    }

    fn to_draft(&self) -> std::result::Result<CandidateDraft, String> {
        let mut form = CandidateForm::default();
        self.apply_to(&mut form);
        form.to_draft()
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RequirementArgs {
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub salary: Option<String>,
    /// Comma-separated
    #[arg(long)]
    pub skills_required: Option<String>,
    #[arg(long)]
    pub experience: Option<String>,
}

impl RequirementArgs {
    pub fn apply_to(&self, form: &mut RequirementForm) {
        overlay(&mut form.position, &self.position);
        overlay(&mut form.company, &self.company);
        overlay(&mut form.location, &self.location);
        overlay(&mut form.description, &self.description);
        overlay(&mut form.salary, &self.salary);
        overlay(&mut form.skills_required, &self.skills_required);
        overlay(&mut form.experience, &self.experience);
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub skills: Option<String>,
}

impl ProfileArgs {
    pub fn apply_to(&self, form: &mut ProfileUpdate) {
        overlay(&mut form.name, &self.name);
        overlay(&mut form.email, &self.email);
        overlay(&mut form.contact, &self.contact);
        overlay(&mut form.city, &self.city);
        overlay(&mut form.skills, &self.skills);
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct CandidateListArgs {
    /// Matches name, skills, city, role and education
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub skills: Option<String>,
    /// Range such as 0-2, 2-5, 5-10 or 10+
    #[arg(long)]
    pub experience: Option<ExperienceRange>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub education: Option<String>,
    #[arg(long)]
    pub availability: Option<Availability>,
    #[arg(long)]
    pub status: Option<CandidateStatus>,
    #[arg(long, default_value = "date")]
    pub sort: SortKey,
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,
    /// Also count the open requirements each candidate has not applied to
    #[arg(long)]
    pub open_jobs: bool,
}

impl CandidateListArgs {
    pub fn to_query(&self) -> CandidateQuery {
        CandidateQuery {
            search: self.search.clone().unwrap_or_default(),
            filters: CandidateFilters {
                skills: self.skills.clone().unwrap_or_default(),
                experience: self.experience,
                location: self.location.clone().unwrap_or_default(),
                education: self.education.clone().unwrap_or_default(),
                availability: self.availability,
                status: self.status,
            },
            sort: SortSpec::new(self.sort, self.order),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RequirementListArgs {
    /// Free-text match on position, company, location, description or skills
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub skills: Option<String>,
    #[arg(long)]
    pub experience: Option<ExperienceRange>,
    #[arg(long, default_value = "date")]
    pub sort: SortKey,
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,
}

impl RequirementListArgs {
    pub fn to_query(&self) -> RequirementQuery {
        RequirementQuery {
            search: self.search.clone().unwrap_or_default(),
            filters: RequirementFilters {
                location: self.location.clone().unwrap_or_default(),
                skills: self.skills.clone().unwrap_or_default(),
                experience: self.experience,
            },
            sort: SortSpec::new(self.sort, self.order),
        }
    }
}

fn overlay(field: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

/// Build the HTTP client and credential store from config, then run.
pub async fn handle_command(cli: PortalCli, config: PortalConfig) -> Result<()> {
    let credentials: Arc<dyn CredentialProvider> =
        Arc::new(FileCredentialStore::new(config.credentials.path.clone()));
    let client = ServiceClient::new(&config.api.base_url, config.timeout(), credentials.clone())
        .context("Failed to build HTTP client")?;
    info!("Using API at {}", client.base_url());

    let api: Arc<dyn PortalApi> = Arc::new(client);
    dispatch(cli.command, api, credentials, cli.json).await
}

pub async fn dispatch(
    command: PortalCommand,
    api: Arc<dyn PortalApi>,
    credentials: Arc<dyn CredentialProvider>,
    json: bool,
) -> Result<()> {
    match command {
        PortalCommand::Auth(cmd) => handle_auth(cmd, AuthService::new(api, credentials)).await,
        PortalCommand::Candidates(cmd) => handle_candidates(cmd, api, json).await,
        PortalCommand::Requirements(cmd) => handle_requirements(cmd, api, json).await,
        PortalCommand::Jobs(cmd) => handle_jobs(cmd, api, json).await,
        PortalCommand::Profile(cmd) => handle_profile(cmd, api, credentials, json).await,
    }
}

async fn handle_auth(cmd: AuthCommand, auth: AuthService) -> Result<()> {
    match cmd {
        AuthCommand::RegisterCandidate(args) => {
            let draft = args.to_draft().map_err(anyhow::Error::msg)?;
            auth.register_candidate(&draft)
                .await
                .map_err(auth_failed)?;
            println!("✅ Registered as candidate {}", draft.name);
        }
        AuthCommand::RegisterRecruiter {
            name,
            email,
            password,
        } => {
            let registration = RecruiterRegistration {
                name,
                email,
                password,
            };
            auth.register_recruiter(&registration)
                .await
                .map_err(auth_failed)?;
            println!("✅ Registered as recruiter {}", registration.name);
        }
        AuthCommand::Login { email, password } => {
            auth.login_recruiter(&RecruiterLogin { email, password })
                .await
                .map_err(auth_failed)?;
            println!("✅ Logged in");
        }
        AuthCommand::Logout => {
            auth.logout().context("Failed to clear stored token")?;
            println!("Logged out");
        }
        AuthCommand::Whoami => match auth.current_claims()? {
            None => println!("Not logged in"),
            Some(claims) => {
                println!("Subject: {}", claims.subject().unwrap_or_else(|| "-".into()));
                if let Some(email) = &claims.email {
                    println!("Email:   {}", email);
                }
                if let Some(role) = &claims.role {
                    println!("Role:    {}", role);
                }
                if let Some(expires) = claims.expires_at() {
                    let state = if claims.is_expired_at(chrono::Utc::now()) {
                        "expired"
                    } else {
                        "valid"
                    };
                    println!("Expires: {} ({})", expires.format("%Y-%m-%d %H:%M UTC"), state);
                }
            }
        },
    }
    Ok(())
}

async fn handle_candidates(cmd: CandidateCommand, api: Arc<dyn PortalApi>, json: bool) -> Result<()> {
    let mut board = CandidateBoard::new(api.clone());

    match cmd {
        CandidateCommand::List(args) => {
            board.refresh().await.map_err(|e| load_failed(e, "candidates"))?;
            board.query = args.to_query();
            let visible = board.visible();

            let open_jobs = if args.open_jobs {
                Some(api.list_requirements().await.map_err(|e| load_failed(e, "requirements"))?)
            } else {
                None
            };

            if json {
                return print_json(&visible);
            }
            print_candidates(&board, &visible, open_jobs.as_deref());
        }
        CandidateCommand::Add(args) => {
            board.start_create();
            args.apply_to(board.form_mut());
            report(board.submit().await)?;
        }
        CandidateCommand::Edit { id, fields } => {
            board.refresh().await.map_err(|e| load_failed(e, "candidates"))?;
            if !board.start_edit(id) {
                anyhow::bail!("Candidate {} not found", id);
            }
            fields.apply_to(board.form_mut());
            report(board.submit().await)?;
        }
        CandidateCommand::Delete { id, yes } => {
            board.refresh().await.map_err(|e| load_failed(e, "candidates"))?;
            let pending = board
                .request_delete(id)
                .cloned()
                .with_context(|| format!("Candidate {} not found", id))?;
            if !yes {
                print_pending(&pending, "candidates delete");
                return Ok(());
            }
            if let Some(notice) = board.confirm_delete().await {
                report(notice)?;
            }
        }
    }
    Ok(())
}

async fn handle_requirements(
    cmd: RequirementCommand,
    api: Arc<dyn PortalApi>,
    json: bool,
) -> Result<()> {
    let mut board = RequirementBoard::new(api);

    match cmd {
        RequirementCommand::List(args) => {
            board.refresh().await.map_err(|e| load_failed(e, "requirements"))?;
            board.query = args.to_query();
            let visible = board.visible();
            if json {
                return print_json(&visible);
            }
            print_requirements(&visible);
        }
        RequirementCommand::Add(args) => {
            board.start_create();
            args.apply_to(board.form_mut());
            report(board.submit().await)?;
        }
        RequirementCommand::Edit { id, fields } => {
            board.refresh().await.map_err(|e| load_failed(e, "requirements"))?;
            if !board.start_edit(id) {
                anyhow::bail!("Requirement {} not found", id);
            }
            fields.apply_to(board.form_mut());
            report(board.submit().await)?;
        }
        RequirementCommand::Delete { id, yes } => {
            board.refresh().await.map_err(|e| load_failed(e, "requirements"))?;
            let pending = board
                .request_delete(id)
                .cloned()
                .with_context(|| format!("Requirement {} not found", id))?;
            if !yes {
                print_pending(&pending, "requirements delete");
                return Ok(());
            }
            if let Some(notice) = board.confirm_delete().await {
                report(notice)?;
            }
        }
    }
    Ok(())
}

async fn handle_jobs(cmd: JobCommand, api: Arc<dyn PortalApi>, json: bool) -> Result<()> {
    let mut board = JobBoard::new(api);
    board.refresh().await.map_err(|e| load_failed(e, "jobs"))?;

    match cmd {
        JobCommand::New(args) => {
            board.tab = JobTab::New;
            board.query = args.to_query();
            list_jobs(&board, json)?;
        }
        JobCommand::Applied(args) => {
            board.tab = JobTab::Applied;
            board.query = args.to_query();
            list_jobs(&board, json)?;
        }
        JobCommand::Apply { id } => report(board.apply(id).await)?,
    }
    Ok(())
}

fn list_jobs(board: &JobBoard, json: bool) -> Result<()> {
    let visible = board.visible();
    if json {
        return print_json(&visible);
    }
    let (new, applied) = board.counts();
    println!("New jobs: {}  Applied: {}", new, applied);
    print_requirements(&visible);
    Ok(())
}

async fn handle_profile(
    cmd: ProfileCommand,
    api: Arc<dyn PortalApi>,
    credentials: Arc<dyn CredentialProvider>,
    json: bool,
) -> Result<()> {
    let mut view = ProfileView::new(api, credentials);
    view.refresh().await.map_err(|e| load_failed(e, "profile"))?;

    match cmd {
        ProfileCommand::Show => {
            let profile = view.profile().context("No profile loaded")?;
            if json {
                return print_json(profile);
            }
            print_profile(profile);
        }
        ProfileCommand::Update(args) => {
            view.start_edit();
            args.apply_to(view.form_mut());
            report(view.save().await)?;
        }
        ProfileCommand::Delete { yes } => {
            let pending = view
                .request_delete()
                .cloned()
                .context("No profile loaded")?;
            if !yes {
                print_pending(&pending, "profile delete");
                return Ok(());
            }
            if let Some(notice) = view.confirm_delete().await {
                report(notice)?;
            }
        }
    }
    Ok(())
}

/// A rejected token becomes the log-in-again message, anything else keeps
/// its cause under a short context line.
fn load_failed(e: PortalError, what: &str) -> anyhow::Error {
    if e.is_auth_failure() && !matches!(e, PortalError::MissingToken) {
        anyhow::anyhow!(SESSION_EXPIRED)
    } else {
        anyhow::Error::new(e).context(format!("Failed to load {}", what))
    }
}

/// Auth endpoints answer bad credentials with 401; show the server message.
fn auth_failed(e: PortalError) -> anyhow::Error {
    match e {
        PortalError::Validation(msg) => anyhow::anyhow!(msg),
        other => anyhow::anyhow!(other
            .server_message()
            .unwrap_or("An error occurred")
            .to_string()),
    }
}

/// Print a notice; error notices become the command's error.
fn report(notice: Notice) -> Result<()> {
    if notice.is_error() {
        anyhow::bail!(notice.message);
    }
    println!("{}", notice);
    Ok(())
}

fn print_pending(pending: &PendingDelete, command: &str) {
    let notice = Notice::info(format!(
        "About to delete {} (#{}). Re-run `job-portal {} --yes` to confirm.",
        pending.display_name, pending.id, command
    ));
    println!("{}", notice);
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

fn print_candidates(board: &CandidateBoard, candidates: &[Candidate], open_jobs: Option<&[Requirement]>) {
    if candidates.is_empty() {
        println!("No candidates found.");
        return;
    }

    let applied = board.application_map();
    println!(
        "{:<5} {:<22} {:<14} {:<5} {:<24} {:<12} {:<8} {:<12}",
        "ID", "Name", "City", "Exp", "Skills", "Status", "Applied", "Last applied"
    );
    println!("{}", "-".repeat(108));

    for candidate in candidates {
        let jobs = applied.get(&candidate.id).map(Vec::len).unwrap_or(0);
        let status = candidate
            .status
            .map(|s| s.as_str())
            .unwrap_or("-");
        let last = board
            .last_applied(candidate.id)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<5} {:<22} {:<14} {:<5} {:<24} {:<12} {:<8} {:<12}",
            candidate.id,
            truncate(&candidate.name, 22),
            truncate(&candidate.city, 14),
            candidate.experience_years(),
            truncate(&candidate.skill_list().join(", "), 24),
            status,
            jobs,
            last
        );
        if let Some(requirements) = open_jobs {
            let open = board.open_requirements_for(candidate.id, requirements);
            println!("      open requirements: {}", open.len());
        }
    }
}

fn print_requirements(requirements: &[Requirement]) {
    if requirements.is_empty() {
        println!("No jobs found.");
        return;
    }

    println!(
        "{:<5} {:<24} {:<18} {:<14} {:<10} {:<5} {:<20}",
        "ID", "Position", "Company", "Location", "Salary", "Exp", "Skills"
    );
    println!("{}", "-".repeat(100));

    for req in requirements {
        let salary = req
            .salary
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<5} {:<24} {:<18} {:<14} {:<10} {:<5} {:<20}",
            req.id,
            truncate(&req.position, 24),
            truncate(&req.company, 18),
            truncate(&req.location, 14),
            salary,
            req.experience_years(),
            truncate(&req.skill_list().join(", "), 20)
        );
    }
}

fn print_profile(profile: &Candidate) {
    println!("{} (#{})", profile.name, profile.id);
    println!("   Email:   {}", profile.email);
    println!("   Contact: {}", profile.contact);
    println!("   City:    {}", profile.city);
    println!("   Skills:  {}", profile.skills);
    if let Some(role) = &profile.current_role {
        println!("   Role:    {}", role);
    }
    if let Some(availability) = profile.availability {
        println!("   {}", availability.label());
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
