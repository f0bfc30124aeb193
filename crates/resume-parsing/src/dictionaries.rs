//! Static vocabularies for dictionary-driven field rules.
//!
//! Entries carry their canonical casing; matching is case-insensitive and
//! results are reported in the casing given here.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

use resume_core::CanonicalField;

pub const SKILLS: &[&str] = &[
    // Programming languages
    "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "PHP", "Ruby", "Swift",
    "Kotlin", "Rust", "Golang", "Scala", "Perl", "Haskell", "Elixir", "Erlang", "Clojure",
    "Objective-C", "Dart", "Lua", "MATLAB", "Julia", "Fortran", "COBOL", "Groovy", "F#",
    "Visual Basic", "VBA", "Assembly", "Bash", "Shell Scripting", "PowerShell", "Solidity",
    "OCaml", "Zig",
    // Web and frontend
    "HTML", "HTML5", "CSS", "CSS3", "SASS", "LESS", "Bootstrap", "Tailwind", "Material UI",
    "React", "React Native", "Angular", "Vue", "Vue.js", "Svelte", "Next.js", "Nuxt.js",
    "jQuery", "Redux", "Webpack", "Vite", "Babel", "Ember.js", "Backbone.js", "D3.js",
    "Three.js", "WebGL", "WebAssembly", "Responsive Design", "Accessibility", "SEO",
    // Backend and frameworks
    "Node.js", "Express", "Django", "Flask", "FastAPI", "Spring", "Spring Boot", "Rails",
    "Ruby on Rails", "Laravel", "Symfony", "ASP.NET", ".NET", ".NET Core", "Gin", "Actix",
    "Phoenix", "NestJS", "Hibernate", "GraphQL", "REST", "RESTful APIs", "gRPC", "SOAP",
    "Microservices", "WebSockets", "OAuth", "JWT",
    // Data stores
    "SQL", "NoSQL", "MongoDB", "MySQL", "PostgreSQL", "Oracle", "SQLite", "Redis",
    "Cassandra", "DynamoDB", "Elasticsearch", "Neo4j", "MariaDB", "Microsoft SQL Server",
    "Snowflake", "BigQuery", "Redshift", "Firebase", "CouchDB", "InfluxDB", "Supabase",
    // Cloud and DevOps
    "AWS", "Azure", "GCP", "Google Cloud", "Docker", "Kubernetes", "CI/CD", "Jenkins",
    "Git", "GitHub", "GitLab", "Bitbucket", "Terraform", "Ansible", "Puppet", "Chef",
    "CloudFormation", "Helm", "Prometheus", "Grafana", "Datadog", "Splunk", "Nginx",
    "Apache", "Linux", "Unix", "Windows Server", "Serverless", "Lambda", "EC2", "S3",
    "CircleCI", "Travis CI", "GitHub Actions", "ArgoCD", "OpenShift", "Vagrant", "DevOps",
    "Site Reliability Engineering", "Infrastructure as Code", "Networking", "TCP/IP",
    "DNS", "Load Balancing", "Cybersecurity", "Penetration Testing", "SIEM", "Firewalls",
    "Identity Management",
    // Data science and AI
    "TensorFlow", "PyTorch", "Keras", "Scikit-learn", "Pandas", "NumPy", "SciPy",
    "Matplotlib", "Seaborn", "Plotly", "Jupyter", "Data Science", "Machine Learning", "AI",
    "Artificial Intelligence", "NLP", "Natural Language Processing", "Computer Vision",
    "Deep Learning", "Reinforcement Learning", "Neural Networks", "LLM", "Generative AI",
    "Hugging Face", "OpenCV", "Spark", "Apache Spark", "Hadoop", "Hive", "Kafka",
    "Airflow", "dbt", "ETL", "Data Engineering", "Data Analysis", "Data Visualization",
    "Data Mining", "Data Modeling", "Data Warehousing", "Big Data", "Statistics",
    "Statistical Analysis", "Predictive Modeling", "A/B Testing", "Tableau", "Power BI",
    "Looker", "Excel", "Google Analytics", "R Studio", "SAS", "SPSS", "Stata",
    "Time Series Analysis", "Feature Engineering", "MLOps",
    // Mobile and testing
    "iOS", "Android", "Flutter", "Xamarin", "SwiftUI", "Jetpack Compose", "Unit Testing",
    "Integration Testing", "Test Automation", "Selenium", "Cypress", "Jest", "Mocha",
    "JUnit", "pytest", "TDD", "BDD", "Quality Assurance",
    // Practices and tools
    "Agile", "Scrum", "Kanban", "Jira", "Confluence", "Trello", "Asana", "Waterfall",
    "Lean", "Six Sigma", "ITIL", "Object-Oriented Programming", "Functional Programming",
    "Design Patterns", "System Design", "Distributed Systems", "Embedded Systems",
    "Blockchain", "IoT", "Version Control", "Code Review", "Technical Writing",
    // Business
    "Project Management", "Product Management", "Program Management", "Stakeholder Management",
    "Strategic Planning", "Business Analysis", "Business Development", "Business Intelligence",
    "Financial Analysis", "Financial Modeling", "Budgeting", "Forecasting", "Accounting",
    "Bookkeeping", "Auditing", "Risk Management", "Compliance", "Operations Management",
    "Supply Chain Management", "Logistics", "Procurement", "Vendor Management",
    "Inventory Management", "Sales", "Account Management", "Customer Service",
    "Customer Success", "CRM", "Salesforce", "HubSpot", "SAP", "QuickBooks", "Marketing",
    "Digital Marketing", "Content Marketing", "Email Marketing", "Social Media Marketing",
    "Social Media", "Market Research", "Brand Management", "Public Relations",
    "Copywriting", "Negotiation", "Leadership", "Team Leadership", "Mentoring", "Coaching",
    "Communication", "Public Speaking", "Presentation Skills", "Problem Solving",
    "Critical Thinking", "Time Management", "Change Management", "Consulting",
    "Process Improvement", "Event Planning", "Fundraising", "Grant Writing", "E-commerce",
    "Shopify", "Microsoft Office", "PowerPoint", "Microsoft Word", "Google Workspace",
    // Healthcare
    "Patient Care", "Electronic Health Records", "EHR", "EMR", "Epic", "Cerner", "HIPAA",
    "Clinical Research", "Medical Coding", "ICD-10", "CPR", "BLS", "ACLS", "Phlebotomy",
    "Pharmacology", "Nursing", "Triage", "Telemetry", "Medication Administration",
    "Infection Control", "Clinical Documentation", "Public Health", "Epidemiology",
    // Legal
    "Legal Research", "Litigation", "Contract Law", "Contract Negotiation",
    "Corporate Law", "Intellectual Property", "Regulatory Compliance", "Due Diligence",
    "Legal Writing", "Westlaw", "LexisNexis", "Mediation", "Paralegal",
    // Human resources
    "Recruiting", "Talent Acquisition", "Onboarding", "Employee Relations",
    "Performance Management", "Compensation and Benefits", "Payroll", "HRIS", "Workday",
    "Training and Development", "Succession Planning", "Diversity and Inclusion",
    // Design
    "UI Design", "UX Design", "UI/UX", "User Research", "Wireframing", "Prototyping",
    "Figma", "Sketch", "Adobe XD", "Adobe Photoshop", "Photoshop", "Illustrator",
    "InDesign", "Adobe Creative Suite", "After Effects", "Premiere Pro", "Graphic Design",
    "Typography", "Motion Graphics", "3D Modeling", "Blender", "AutoCAD", "SolidWorks",
    "Revit", "Video Editing", "Photography",
    // Education
    "Curriculum Development", "Lesson Planning", "Classroom Management",
    "Instructional Design", "E-Learning", "Special Education", "Tutoring",
    "Student Assessment", "Educational Technology", "Moodle", "Canvas", "Blackboard",
];

pub const INDUSTRIES: &[&str] = &[
    "Technology", "Software", "Information Technology", "Finance", "Financial Services",
    "Banking", "Insurance", "Healthcare", "Pharmaceuticals", "Biotechnology", "Education",
    "Retail", "E-commerce", "Manufacturing", "Automotive", "Aerospace", "Defense",
    "Energy", "Oil and Gas", "Renewable Energy", "Telecommunications", "Media",
    "Entertainment", "Hospitality", "Real Estate", "Construction", "Transportation",
    "Logistics", "Consulting", "Legal Services", "Government", "Non-profit",
    "Agriculture", "Food and Beverage", "Marketing and Advertising", "Gaming",
];

pub const JOB_TITLE_KEYWORDS: &[&str] = &[
    "Manager", "Engineer", "Director", "Developer", "Analyst", "Designer", "Consultant",
    "Specialist", "Coordinator", "Administrator", "Architect", "Scientist", "Intern",
    "Lead", "Officer", "Assistant", "Associate", "Executive", "President", "Technician",
    "Nurse", "Teacher", "Accountant", "Attorney", "Representative", "Supervisor",
    "Strategist", "Researcher", "Recruiter", "Editor", "Writer", "Programmer", "Founder",
    "Co-Founder", "Owner", "Partner", "Head", "Chief", "Principal", "Instructor",
    "Professor", "Paralegal", "Pharmacist", "Physician", "Therapist", "Auditor",
    "Advisor", "Agent", "Clerk", "Operator", "CEO", "CTO", "CFO", "COO", "CIO", "VP",
];

/// Section header phrases and the canonical field each one feeds.
///
/// Longer phrases come first so "work experience" wins over "experience" on
/// the same line.
pub const SECTION_HEADERS: &[(&str, CanonicalField)] = &[
    ("professional experience", CanonicalField::Experience),
    ("professional summary", CanonicalField::Summary),
    ("employment history", CanonicalField::Experience),
    ("volunteer experience", CanonicalField::Volunteer),
    ("work experience", CanonicalField::Experience),
    ("work history", CanonicalField::Experience),
    ("technical skills", CanonicalField::Skills),
    ("core competencies", CanonicalField::Skills),
    ("certifications", CanonicalField::Certifications),
    ("achievements", CanonicalField::Achievements),
    ("publications", CanonicalField::Publications),
    ("volunteering", CanonicalField::Volunteer),
    ("employment", CanonicalField::Experience),
    ("experience", CanonicalField::Experience),
    ("education", CanonicalField::Education),
    ("objective", CanonicalField::Summary),
    ("languages", CanonicalField::Languages),
    ("volunteer", CanonicalField::Volunteer),
    ("projects", CanonicalField::Projects),
    ("awards", CanonicalField::Achievements),
    ("honors", CanonicalField::Achievements),
    ("summary", CanonicalField::Summary),
    ("profile", CanonicalField::Summary),
    ("skills", CanonicalField::Skills),
    ("about", CanonicalField::Summary),
];

/// Names of the standard sections, used to tell custom headers apart.
pub fn standard_section_names() -> impl Iterator<Item = &'static str> {
    SECTION_HEADERS.iter().map(|(name, _)| *name)
}

/// Two-letter codes accepted as the region part of a `City, ST` location.
pub const REGION_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV",
    "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN",
    "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY", "DC", "PR", "AB", "BC", "MB", "NB",
    "NL", "NS", "ON", "PE", "QC", "SK", "UK",
];

/// Case-insensitive whole-word matcher over a list of terms.
///
/// Each term is matched on its own, so a term nested in a longer one
/// ("Rails" in "Ruby on Rails") is still reported. A `RegexSet` narrows the
/// candidates in one pass before the per-term scans. Word boundaries are
/// checked by hand because terms like `C++` or `.NET` start or end with
/// non-word characters.
#[derive(Debug, Clone)]
pub struct DictionaryMatcher {
    set: RegexSet,
    patterns: Vec<Regex>,
    terms: Vec<String>,
}

impl DictionaryMatcher {
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self, regex::Error> {
        let mut seen = HashSet::new();
        let terms: Vec<String> = terms
            .iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
            .collect();

        let sources: Vec<String> = terms
            .iter()
            .map(|t| format!("(?i){}", regex::escape(t)))
            .collect();
        let set = RegexSet::new(&sources)?;
        let patterns = sources
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            set,
            patterns,
            terms,
        })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Every dictionary term occurring in `text` as a whole word, in
    /// canonical casing, ordered by first occurrence. Terms starting at the
    /// same offset are ordered longest first.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        let mut hits: Vec<(usize, usize, &String)> = self
            .set
            .matches(text)
            .into_iter()
            .filter_map(|i| {
                self.patterns[i]
                    .find_iter(text)
                    .find(|m| is_word_bounded(text, m.start(), m.end()))
                    .map(|m| (m.start(), m.len(), &self.terms[i]))
            })
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        hits.into_iter().map(|(_, _, term)| term.clone()).collect()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.set
            .matches(text)
            .into_iter()
            .any(|i| {
                self.patterns[i]
                    .find_iter(text)
                    .any(|m| is_word_bounded(text, m.start(), m.end()))
            })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().is_none_or(|c| !is_word_char(c));
    let after_ok = text[end..].chars().next().is_none_or(|c| !is_word_char(c));
    before_ok && after_ok
}

pub static DEFAULT_SKILLS: Lazy<DictionaryMatcher> =
    Lazy::new(|| DictionaryMatcher::new(SKILLS).unwrap());

pub static DEFAULT_INDUSTRIES: Lazy<DictionaryMatcher> =
    Lazy::new(|| DictionaryMatcher::new(INDUSTRIES).unwrap());

pub static DEFAULT_TITLE_KEYWORDS: Lazy<HashSet<String>> =
    Lazy::new(|| JOB_TITLE_KEYWORDS.iter().map(|k| k.to_lowercase()).collect());
