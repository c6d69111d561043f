use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use client::ApiClient;
use configs::AppConfig;
use dotenvy::dotenv;
use models::user::{LoginCredentials, RegisterInput};
use service::auth::{AuthService, RegistrationService};
use service::catalog::{CategoryBoard, CategoryService};
use service::i18n::{user_message, Locale};
use service::orders::{OrderBoard, OrderFilter, OrderPoller, OrderService};
use service::plans::{self, PlanService};
use service::session::{SessionContext, SessionKeys};
use service::storage::JsonMapStore;
use service::tenant_service::TenantService;
use service::ServiceError;
use tracing::{error, info};
use uuid::Uuid;

const USAGE: &str = "usage: dashboard <login EMAIL PASSWORD | logout | refresh | register TENANT NAME EMAIL [PHONE] | categories | plans | tenant | watch>";

struct App {
    cfg: AppConfig,
    locale: Locale,
    session: Arc<SessionContext>,
    api: ApiClient,
}

fn main() -> ExitCode {
    dotenv().ok();
    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(cfg.logging.json);

    let run_id = Uuid::new_v4();
    info!(service = "dashboard", event = "start", %run_id, base_url = %cfg.api.base_url, "dashboard starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "dashboard", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cfg, args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "dashboard", event = "command_failed", %run_id, error = %e, "command failed");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: AppConfig, args: Vec<String>) -> anyhow::Result<()> {
    let app = App::open(cfg).await?;
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();
    match argv.as_slice() {
        ["login", email, password] => app.login(email, password).await,
        ["logout"] => app.logout().await,
        ["refresh"] => app.refresh().await,
        ["register", tenant, name, email] => app.register(tenant, name, email, None).await,
        ["register", tenant, name, email, phone] => app.register(tenant, name, email, Some(*phone)).await,
        ["categories"] => app.categories().await,
        ["plans"] => app.plans().await,
        ["tenant"] => app.tenant().await,
        ["watch"] => app.watch().await,
        _ => Err(anyhow!(USAGE)),
    }
}

impl App {
    async fn open(cfg: AppConfig) -> anyhow::Result<Self> {
        common::env::ensure_parent_dir(&cfg.session.file).await?;
        let store = JsonMapStore::open(&cfg.session.file)
            .with_context(|| format!("opening session file {}", cfg.session.file))?;
        let session = Arc::new(SessionContext::shared(Arc::new(store), SessionKeys::from(&cfg.session)));
        let api = ApiClient::with_persistent_cookies(&cfg.api, session.clone(), session.clone())?;
        let locale = cfg.dashboard.locale.parse::<Locale>().map_err(|e| anyhow!(e))?;
        Ok(Self { cfg, locale, session, api })
    }

    fn explain(&self, err: ServiceError) -> anyhow::Error {
        anyhow!(user_message(self.locale, &err))
    }

    fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone())
    }

    async fn login(&self, email: &str, password: &str) -> anyhow::Result<()> {
        let resp = self
            .auth()
            .login(LoginCredentials::new(email, password))
            .await
            .map_err(|e| self.explain(e))?;
        info!(user = %resp.user.email, tenant = ?resp.tenant_identifier(), "logged in");
        Ok(())
    }

    async fn logout(&self) -> anyhow::Result<()> {
        self.auth().logout().await.map_err(|e| self.explain(e))
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        match self.auth().refresh_session().await.map_err(|e| self.explain(e))? {
            Some(resp) => info!(user = %resp.user.email, "session refreshed"),
            None => info!("session expired; logged out"),
        }
        Ok(())
    }

    async fn register(&self, tenant: &str, name: &str, email: &str, phone: Option<&str>) -> anyhow::Result<()> {
        let input = RegisterInput {
            tenant_name: tenant.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
        };
        let resp = RegistrationService::new(self.api.clone(), self.session.clone())
            .register(input)
            .await
            .map_err(|e| self.explain(e))?;
        info!(tenant = ?resp.tenant.map(|t| t.slug), "tenant registered");
        Ok(())
    }

    async fn categories(&self) -> anyhow::Result<()> {
        let board = CategoryBoard::new(CategoryService::new(self.api.clone()), self.locale);
        board.refresh().await.map_err(|e| self.explain(e))?;
        for c in board.categories().await {
            let state = if c.is_active { "active" } else { "inactive" };
            println!("{}\t{}\t{}\t{}", c.id, c.name, state, c.opening_hours.unwrap_or_default());
        }
        Ok(())
    }

    async fn plans(&self) -> anyhow::Result<()> {
        let landing = PlanService::new(self.api.clone())
            .landing_plans()
            .await
            .map_err(|e| self.explain(e))?;
        for p in landing {
            let annual = if plans::has_annual_price(&p) {
                format!("{} /mês no anual", plans::format_annual_price(p.annual_price_cents.unwrap_or_default()))
            } else {
                String::new()
            };
            println!("{}\t{}\t{}\t{}", p.slug, p.name, common::utils::money::format_price_or_free(p.price_cents), annual);
        }
        Ok(())
    }

    async fn tenant(&self) -> anyhow::Result<()> {
        let tenant = TenantService::new(self.api.clone()).current().await.map_err(|e| self.explain(e))?;
        println!("{}", serde_json::to_string_pretty(&tenant)?);
        Ok(())
    }

    async fn watch(&self) -> anyhow::Result<()> {
        let offset = *chrono::Local::now().offset();
        let board = Arc::new(OrderBoard::new(
            OrderService::new(self.api.clone()),
            TenantService::new(self.api.clone()),
            offset,
            self.locale,
        ));
        if let Some(t) = board.load_tenant().await {
            info!(tenant = %t.slug, name = %t.name, plan = %t.plan, "watching orders");
        }

        let poller = OrderPoller::spawn(board.clone(), self.cfg.dashboard.poll_interval());
        let mut summary = tokio::time::interval(self.cfg.dashboard.poll_interval());
        loop {
            tokio::select! {
                _ = summary.tick() => {
                    if let Some(err) = board.error().await {
                        info!(error = %err, "order board error");
                        continue;
                    }
                    for (column, orders) in board.columns(&OrderFilter::default()).await {
                        info!(column = column.as_str(), title = column.meta().title, count = orders.len(), "order column");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!(service = "dashboard", event = "shutdown_signal", "received Ctrl+C, stopping poller");
                    break;
                }
            }
        }
        poller.stop().await;
        Ok(())
    }
}
