//! Integration tests for the marketplace repositories.
//!
//! Run against a real database (`DATABASE_URL`):
//! - `ensure` creates a profile once and never overwrites it
//! - a role is written to identity metadata at most once
//! - a student can apply to a job only once
//! - featuring a blog post un-features the previous one
//! - publishing stamps `published_at` once

use sqlx::PgPool;
use upstart_core::onboarding::OnboardingSubmission;
use upstart_core::roles::Role;
use upstart_core::session::UserMetadata;
use upstart_db::models::auth::CreateAuthUser;
use upstart_db::models::blog_post::CreateBlogPost;
use upstart_db::models::job::CreateJob;
use upstart_db::models::student::UpdateStudent;
use upstart_db::profile_store::{PgProfileStore, Profile, ProfileStore};
use upstart_db::repositories::{
    ApplicationRepo, AuthUserRepo, BlogPostRepo, CompanyRepo, JobRepo, StudentRepo,
};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_job(title: &str) -> CreateJob {
    CreateJob {
        title: title.to_string(),
        description: "Build things".to_string(),
        job_type: "internship".to_string(),
        location: None,
        salary_min: None,
        salary_max: None,
        skills: None,
    }
}

fn new_post(slug: &str) -> CreateBlogPost {
    CreateBlogPost {
        author_id: Uuid::new_v4(),
        title: slug.to_string(),
        slug: slug.to_string(),
        excerpt: String::new(),
        content: "Body".to_string(),
        cover_image_url: None,
        is_published: true,
    }
}

fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            db.constraint().map(str::to_string)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_ensure_is_idempotent(pool: PgPool) {
    let id = Uuid::new_v4();
    let first = StudentRepo::ensure(&pool, id).await.unwrap();
    assert_eq!(first.id, id);

    let update = UpdateStudent {
        university: Some("MIT".into()),
        ..Default::default()
    };
    StudentRepo::update(&pool, id, &update).await.unwrap();

    let second = StudentRepo::ensure(&pool, id).await.unwrap();
    assert_eq!(second.university.as_deref(), Some("MIT"), "ensure must not reset the row");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM students WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_profile_store_completes_onboarding(pool: PgPool) {
    let store = PgProfileStore::new(pool.clone());
    let id = Uuid::new_v4();

    assert!(CompanyRepo::find_by_id(&pool, id).await.unwrap().is_none());
    store.ensure_profile(id, Role::Startup).await.unwrap();

    let submission = OnboardingSubmission::Startup {
        company_name: "Acme".into(),
    };
    let profile = store.complete_onboarding(id, &submission).await.unwrap();
    match profile {
        Profile::Company(company) => assert_eq!(company.company_name.as_deref(), Some("Acme")),
        other => panic!("expected company profile, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Identity metadata
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_role_is_written_only_once(pool: PgPool) {
    let input = CreateAuthUser {
        id: Uuid::new_v4(),
        email: "first@example.com".into(),
        password_hash: "hash".into(),
        user_metadata: serde_json::json!({ "role": "admin", "theme": "dark" }),
    };
    let user = AuthUserRepo::create(&pool, &input).await.unwrap();

    // An unrecognised role value does not count as assigned.
    let startup = UserMetadata::new_role(Role::Startup).to_json();
    let written = AuthUserRepo::merge_metadata_if_roleless(&pool, user.id, &startup)
        .await
        .unwrap()
        .expect("first role write must land");
    assert_eq!(written.user_metadata["role"], "startup");
    assert_eq!(written.user_metadata["onboarding_status"], "not_started");
    assert_eq!(written.user_metadata["theme"], "dark");

    let student = UserMetadata::new_role(Role::Student).to_json();
    let second = AuthUserRepo::merge_metadata_if_roleless(&pool, user.id, &student)
        .await
        .unwrap();
    assert!(second.is_none(), "a second role write must be refused");

    let stored = AuthUserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.to_session_user().role, Some(Role::Startup));
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_application_is_rejected(pool: PgPool) {
    let company = Uuid::new_v4();
    let student = Uuid::new_v4();
    CompanyRepo::ensure(&pool, company).await.unwrap();
    StudentRepo::ensure(&pool, student).await.unwrap();

    let job = JobRepo::create(&pool, company, &new_job("Intern"), &serde_json::json!([]))
        .await
        .unwrap();

    ApplicationRepo::create(&pool, job.id, student, Some("Hi"), None)
        .await
        .unwrap();
    let err = ApplicationRepo::create(&pool, job.id, student, None, None)
        .await
        .unwrap_err();
    assert_eq!(
        unique_violation(&err).as_deref(),
        Some("uq_applications_job_student")
    );

    assert_eq!(ApplicationRepo::count_for_student(&pool, student).await.unwrap(), 1);
    assert_eq!(ApplicationRepo::count_for_company(&pool, company).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_job_mutations_are_scoped_to_owner(pool: PgPool) {
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    CompanyRepo::ensure(&pool, owner).await.unwrap();
    CompanyRepo::ensure(&pool, other).await.unwrap();

    let job = JobRepo::create(&pool, owner, &new_job("Designer"), &serde_json::json!(["Figma"]))
        .await
        .unwrap();

    assert!(JobRepo::set_active(&pool, job.id, other, false).await.unwrap().is_none());
    assert!(!JobRepo::delete(&pool, job.id, other).await.unwrap());

    let closed = JobRepo::set_active(&pool, job.id, owner, false).await.unwrap().unwrap();
    assert!(!closed.is_active);
    assert!(JobRepo::list_active(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Blog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_set_featured_swaps_correctly(pool: PgPool) {
    let a = BlogPostRepo::create(&pool, &new_post("first")).await.unwrap();
    let b = BlogPostRepo::create(&pool, &new_post("second")).await.unwrap();

    BlogPostRepo::set_featured(&pool, a.id, true).await.unwrap();
    let b = BlogPostRepo::set_featured(&pool, b.id, true).await.unwrap().unwrap();
    assert!(b.is_featured);

    let a = BlogPostRepo::find_by_id(&pool, a.id).await.unwrap().unwrap();
    assert!(!a.is_featured, "previous featured post should be un-marked");
    assert_eq!(BlogPostRepo::count_featured(&pool).await.unwrap(), 1);

    let featured = BlogPostRepo::find_featured(&pool).await.unwrap().unwrap();
    assert_eq!(featured.id, b.id);

    // Featuring a missing post leaves the current one in place.
    assert!(BlogPostRepo::set_featured(&pool, 999_999, true).await.unwrap().is_none());
    assert_eq!(BlogPostRepo::count_featured(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_publish_keeps_first_timestamp(pool: PgPool) {
    let mut draft = new_post("draft");
    draft.is_published = false;
    let post = BlogPostRepo::create(&pool, &draft).await.unwrap();
    assert!(post.published_at.is_none());
    assert!(BlogPostRepo::list(&pool, false).await.unwrap().is_empty());

    let published = BlogPostRepo::set_published(&pool, post.id, true).await.unwrap().unwrap();
    let stamped = published.published_at.expect("published_at set on publish");

    BlogPostRepo::set_published(&pool, post.id, false).await.unwrap();
    let again = BlogPostRepo::set_published(&pool, post.id, true).await.unwrap().unwrap();
    assert_eq!(again.published_at, Some(stamped));

    assert_eq!(BlogPostRepo::list(&pool, true).await.unwrap().len(), 1);
    assert!(BlogPostRepo::slug_taken(&pool, "draft", None).await.unwrap());
    assert!(!BlogPostRepo::slug_taken(&pool, "draft", Some(post.id)).await.unwrap());
}
