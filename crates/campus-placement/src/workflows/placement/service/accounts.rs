use super::{audit, load_account, load_company, load_student, PlacementService, PlacementServiceError};
use crate::workflows::placement::access::{authorize, Actor};
use crate::workflows::placement::domain::{Account, AccountId, CompanyProfile, Role, StudentProfile};
use crate::workflows::placement::report::StudentRow;
use crate::workflows::placement::repository::{
    NewAccount, PlacementStore, PlacementTx, USERNAME_CONSTRAINT,
};
use crate::workflows::placement::validation::{
    resume_file_name, AccountUpdate, AdminRegistration, CompanyProfileUpdate, CompanyRegistration,
    StudentProfileUpdate, StudentRegistration, ValidationError,
};

/// Inserts the account, reporting a taken username as a validation failure.
pub(crate) fn create_account(
    tx: &mut dyn PlacementTx,
    account: NewAccount,
) -> Result<Account, PlacementServiceError> {
    if tx.account_by_username(&account.username)?.is_some() {
        return Err(ValidationError::UsernameTaken(account.username).into());
    }

    let username = account.username.clone();
    tx.insert_account(account).map_err(|err| {
        if err.is_conflict_on(USERNAME_CONSTRAINT) {
            ValidationError::UsernameTaken(username).into()
        } else {
            err.into()
        }
    })
}

/// Account plus its student profile, inside the caller's transaction.
pub(crate) fn create_student(
    tx: &mut dyn PlacementTx,
    registration: StudentRegistration,
    at: chrono::DateTime<chrono::Utc>,
) -> Result<(Account, StudentProfile), PlacementServiceError> {
    let account = create_account(
        tx,
        NewAccount {
            username: registration.username,
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
            role: Role::Student,
            created_at: at,
        },
    )?;

    let mut profile = StudentProfile::new(account.id, registration.branch);
    profile.cgpa = registration.cgpa;
    profile.backlogs = registration.backlogs;
    tx.insert_student_profile(profile.clone())?;
    Ok((account, profile))
}

impl<S> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    /// Maps a session identity onto an actor. Unknown accounts are unauthenticated.
    pub fn resolve_actor(&self, account_id: AccountId) -> Result<Actor, PlacementServiceError> {
        let account = self
            .store
            .read(|reader| Ok::<_, PlacementServiceError>(reader.account(account_id)?))?;
        account
            .map(|account| Actor::new(account.id, account.role))
            .ok_or(PlacementServiceError::Unauthenticated)
    }

    pub fn register_student(
        &self,
        registration: StudentRegistration,
    ) -> Result<StudentRow, PlacementServiceError> {
        let registration = registration.validate()?;
        let now = self.now();

        let (account, profile) = self.store.transaction(|tx| {
            let (account, profile) = create_student(tx, registration, now)?;
            audit(
                tx,
                Some(account.id),
                format!("New student registered: {}", account.username),
                now,
            )?;
            Ok::<_, PlacementServiceError>((account, profile))
        })?;

        tracing::info!(
            account_id = account.id.0,
            branch = profile.branch.code(),
            "student registered"
        );
        Ok(StudentRow { account, profile })
    }

    pub fn register_company(
        &self,
        registration: CompanyRegistration,
    ) -> Result<(Account, CompanyProfile), PlacementServiceError> {
        let registration = registration.validate()?;
        let now = self.now();

        let created = self.store.transaction(|tx| {
            let account = create_account(
                tx,
                NewAccount {
                    username: registration.username,
                    email: registration.email,
                    first_name: String::new(),
                    last_name: String::new(),
                    role: Role::Company,
                    created_at: now,
                },
            )?;
            let profile = CompanyProfile::new(account.id, registration.company_name);
            tx.insert_company_profile(profile.clone())?;
            audit(
                tx,
                Some(account.id),
                format!("New company registered: {}", profile.name),
                now,
            )?;
            Ok::<_, PlacementServiceError>((account, profile))
        })?;

        tracing::info!(account_id = created.0.id.0, "company registered, awaiting approval");
        Ok(created)
    }

    /// Administrators are provisioned out of band (CLI), never self-registered.
    pub fn create_admin(
        &self,
        registration: AdminRegistration,
    ) -> Result<Account, PlacementServiceError> {
        let registration = registration.validate()?;
        let now = self.now();

        let account = self.store.transaction(|tx| {
            let account = create_account(
                tx,
                NewAccount {
                    username: registration.username,
                    email: registration.email,
                    first_name: registration.first_name,
                    last_name: registration.last_name,
                    role: Role::Admin,
                    created_at: now,
                },
            )?;
            audit(
                tx,
                Some(account.id),
                format!("Administrator account created: {}", account.username),
                now,
            )?;
            Ok::<_, PlacementServiceError>(account)
        })?;

        tracing::info!(account_id = account.id.0, "administrator created");
        Ok(account)
    }

    pub fn update_account(
        &self,
        actor: &Actor,
        update: AccountUpdate,
    ) -> Result<Account, PlacementServiceError> {
        let update = update.validate()?;

        self.store.transaction(|tx| {
            let mut account = load_account(&*tx, actor.account_id)?;
            account.first_name = update.first_name;
            account.last_name = update.last_name;
            account.email = update.email;
            tx.update_account(&account)?;
            Ok(account)
        })
    }

    pub fn student_profile(&self, actor: &Actor) -> Result<StudentRow, PlacementServiceError> {
        authorize(actor, Role::Student, "student_profile")?;
        self.store.read(|reader| {
            Ok(StudentRow {
                account: load_account(reader, actor.account_id)?,
                profile: load_student(reader, actor.account_id)?,
            })
        })
    }

    /// Replaces the editable fields; the resume and the placement flag are kept.
    pub fn update_student_profile(
        &self,
        actor: &Actor,
        update: StudentProfileUpdate,
    ) -> Result<StudentProfile, PlacementServiceError> {
        authorize(actor, Role::Student, "update_student_profile")?;
        let update = update.validate()?;

        let profile = self.store.transaction(|tx| {
            let mut profile = load_student(&*tx, actor.account_id)?;
            profile.phone_number = update.phone_number;
            profile.cgpa = update.cgpa;
            profile.branch = update.branch;
            profile.graduation_year = update.graduation_year;
            profile.backlogs = update.backlogs;
            profile.skills = update.skills;
            profile.linkedin_url = update.linkedin_url;
            profile.github_url = update.github_url;
            tx.update_student_profile(&profile)?;
            Ok::<_, PlacementServiceError>(profile)
        })?;

        tracing::debug!(account_id = actor.account_id.0, "student profile updated");
        Ok(profile)
    }

    pub fn upload_resume(
        &self,
        actor: &Actor,
        file_name: &str,
    ) -> Result<StudentProfile, PlacementServiceError> {
        authorize(actor, Role::Student, "upload_resume")?;
        let file_name = resume_file_name(file_name)?;

        self.store.transaction(|tx| {
            let mut profile = load_student(&*tx, actor.account_id)?;
            profile.resume = Some(file_name);
            tx.update_student_profile(&profile)?;
            Ok(profile)
        })
    }

    pub fn company_profile(&self, actor: &Actor) -> Result<CompanyProfile, PlacementServiceError> {
        authorize(actor, Role::Company, "company_profile")?;
        self.store
            .read(|reader| load_company(reader, actor.account_id))
    }

    /// Approval is left as the administrator set it.
    pub fn update_company_profile(
        &self,
        actor: &Actor,
        update: CompanyProfileUpdate,
    ) -> Result<CompanyProfile, PlacementServiceError> {
        authorize(actor, Role::Company, "update_company_profile")?;
        let update = update.validate()?;

        self.store.transaction(|tx| {
            let mut profile = load_company(&*tx, actor.account_id)?;
            profile.name = update.name;
            profile.description = update.description;
            profile.website = update.website;
            profile.hr_name = update.hr_name;
            profile.hr_email = update.hr_email;
            tx.update_company_profile(&profile)?;
            Ok(profile)
        })
    }
}
