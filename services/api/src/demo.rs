use crate::infra::in_memory_services;
use chrono::{Datelike, Duration, Months, NaiveDate, Utc};
use clap::Args;
use tasktaker::config::ListingConfig;
use tasktaker::error::AppError;
use tasktaker::marketplace::accounts::{AccountType, Registration, UserId};
use tasktaker::marketplace::jobs::{
    ApplyRequest, Budget, Job, JobCategory, JobDraft, ListJobsQuery, Location, PricingType,
    Urgency,
};
use tasktaker::marketplace::Actor;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Final price recorded when the job is completed
    #[arg(long, default_value_t = 28)]
    pub(crate) final_price: u32,
    /// Cancel the job after accepting instead of completing it
    #[arg(long)]
    pub(crate) cancel: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (jobs, accounts) = in_memory_services(ListingConfig::default());
    let today = Utc::now().date_naive();

    let poster = actor("adult-demo", AccountType::Adult);
    let ava = actor("teen-ava", AccountType::Teen);
    let ben = actor("teen-ben", AccountType::Teen);

    println!("TaskTaker job lifecycle demo");
    accounts.register(&poster, registration("Morgan", AccountType::Adult, years_ago(today, 42)))?;
    accounts.register(&ava, registration("Ava", AccountType::Teen, years_ago(today, 16)))?;
    accounts.register(&ben, registration("Ben", AccountType::Teen, years_ago(today, 15)))?;
    println!("- Registered 1 adult and 2 teen accounts");

    let job = jobs.create_job(&poster, demo_draft())?;
    print_job("Posted", &job);

    jobs.apply(&ava, &job.id, proposal("I bring my own mower", 30))?;
    let job = jobs.apply(&ben, &job.id, proposal("Free every Saturday", 25))?;
    println!("- {} applications received", job.applicants.len());
    for applicant in &job.applicants {
        println!(
            "    - {}: ${} ({:?})",
            applicant.user, applicant.proposed_price, applicant.status
        );
    }

    let job = jobs.accept_applicant(&poster, &job.id, &ava.id)?;
    print_job("Accepted applicant", &job);
    for applicant in &job.applicants {
        println!("    - {} -> {:?}", applicant.user, applicant.status);
    }

    let job = if args.cancel {
        jobs.cancel_job(&poster, &job.id)?
    } else {
        jobs.complete_job(&ava, &job.id, args.final_price)?
    };
    print_job("Finished", &job);
    if let Some(price) = job.final_price {
        println!(
            "    Final price ${} over {:.1} hours",
            price,
            job.duration_hours()
        );
    }

    if job.final_price.is_some() {
        let rated = accounts.rate(&poster, &ava.id, 5)?;
        println!(
            "- {} rated {:.1} from {} review(s)",
            rated.first_name, rated.rating.average, rated.rating.count
        );
    }

    let open = jobs.list_jobs(&ListJobsQuery::default())?;
    println!("- Open listings remaining: {}", open.total);
    Ok(())
}

fn actor(id: &str, account_type: AccountType) -> Actor {
    Actor {
        id: UserId(id.to_string()),
        account_type,
    }
}

fn registration(first_name: &str, account_type: AccountType, born: NaiveDate) -> Registration {
    Registration {
        email: format!("{}@tasktaker.test", first_name.to_lowercase()),
        first_name: first_name.to_string(),
        last_name: "Demo".to_string(),
        account_type,
        date_of_birth: born,
        phone: None,
        location: None,
    }
}

fn years_ago(today: NaiveDate, years: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(years * 12))
        .unwrap_or_else(|| today.with_day(1).unwrap_or(today))
}

fn proposal(text: &str, price: u32) -> ApplyRequest {
    ApplyRequest {
        proposal: text.to_string(),
        proposed_price: price,
    }
}

fn demo_draft() -> JobDraft {
    JobDraft {
        title: "Mow the front lawn".to_string(),
        description: "Front and back yard, roughly a quarter acre.".to_string(),
        category: JobCategory::LawnCare,
        location: Location {
            address: "12 Maple Street".to_string(),
            city: "Des Moines".to_string(),
            state: "IA".to_string(),
            zip_code: "50309".to_string(),
            coordinates: None,
        },
        budget: Budget {
            min: 20,
            max: 40,
            pricing: PricingType::Fixed,
        },
        estimated_duration_hours: 2.0,
        urgency: Urgency::Medium,
        required_skills: vec!["mowing".to_string()],
        images: Vec::new(),
        start_date: Utc::now() + Duration::days(1),
        end_date: None,
        tags: vec!["outdoor".to_string()],
    }
}

fn print_job(stage: &str, job: &Job) {
    let assignee = job
        .assigned_to
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unassigned".to_string());
    println!(
        "- {stage}: {} \"{}\" [{}] {}",
        job.id, job.title, job.status, assignee
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_ago_keeps_calendar_day() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
        assert_eq!(
            years_ago(today, 16),
            NaiveDate::from_ymd_opt(2010, 3, 1).expect("valid date")
        );
    }

    #[test]
    fn demo_runs_to_completion() {
        run_demo(DemoArgs {
            final_price: 28,
            cancel: false,
        })
        .expect("demo completes");
    }

    #[test]
    fn demo_can_cancel() {
        run_demo(DemoArgs {
            final_price: 28,
            cancel: true,
        })
        .expect("demo cancels");
    }
}
