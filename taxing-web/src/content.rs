//! Static site content rendered by the public pages

#[derive(Debug, Clone, Copy)]
pub struct Service {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Testimonial {
    pub name: &'static str,
    pub position: &'static str,
    pub text: &'static str,
}

/// `(value, label)` pairs for a `<select>`
pub type Choice = (&'static str, &'static str);

pub const CORE_SERVICES: [Service; 6] = [
    Service {
        title: "Business Strategy",
        description: "Comprehensive strategic planning and market positioning to accelerate growth.",
    },
    Service {
        title: "Growth Solutions",
        description: "Scalable strategies designed to maximize business potential and revenue.",
    },
    Service {
        title: "Team Excellence",
        description: "Leadership development and team optimization for high performance.",
    },
    Service {
        title: "Market Analysis",
        description: "Deep market insights and competitive intelligence for informed decisions.",
    },
    Service {
        title: "Financial Advisory",
        description: "Expert financial planning and investment strategies for optimal performance.",
    },
    Service {
        title: "Global Expansion",
        description: "Strategic guidance for international growth and market entry.",
    },
];

pub const SERVICE_CATALOG: [Service; 12] = [
    Service {
        title: "GST Filing",
        description: "GST (Good and Service Tax) is a tax implemented on the goods and services used in India.",
    },
    Service {
        title: "Private Limited Company Registration",
        description: "Get your Company Registration Online in 7 working days, the fastest incorporation across India.",
    },
    Service {
        title: "FSSAI (Food License)",
        description: "A licence from the Food Safety & Standard Authority of India is a must in the food sector.",
    },
    Service {
        title: "Trademark Registration",
        description: "Protect your business from copy cats by filing brand name registration.",
    },
    Service {
        title: "MSME - Udyam Registration",
        description: "Avail government schemes and subsidies for Micro, Small and Medium scale enterprises.",
    },
    Service {
        title: "Import & Export Code (IEC)",
        description: "Businesses importing or exporting goods need an IEC Code. Register online with us.",
    },
    Service {
        title: "Risk Management",
        description: "Comprehensive risk assessment and mitigation strategies to protect your business interests.",
    },
    Service {
        title: "ROC Compliances",
        description: "Run your business in a more legalized and tension-free manner.",
    },
    Service {
        title: "Income Tax Returns",
        description: "Accurate, on-time returns for individuals and businesses.",
    },
    Service {
        title: "E-Tendering",
        description: "Registration and bid support for government e-tenders.",
    },
    Service {
        title: "Investment Plans",
        description: "Plans matched to your goals, horizon and appetite for risk.",
    },
    Service {
        title: "Insurance",
        description: "Cover for your people, premises and business continuity.",
    },
];

pub const FAQS: [Faq; 5] = [
    Faq {
        question: "What services does TaxingSolutions offer?",
        answer: "Strategic planning, team management, market analysis and growth solutions, tailored to businesses of all sizes.",
    },
    Faq {
        question: "How long does a typical project take?",
        answer: "Most strategic consulting projects take 3-6 months; smaller initiatives can be completed in 4-8 weeks.",
    },
    Faq {
        question: "Do you work with startups or only established companies?",
        answer: "We work with businesses at all stages, from early-stage startups to established enterprises.",
    },
    Faq {
        question: "What makes TaxingSolutions different from other firms?",
        answer: "We work alongside you to implement solutions and ensure lasting results.",
    },
    Faq {
        question: "How do you measure project success?",
        answer: "We agree clear, measurable KPIs at the start of every project.",
    },
];

pub const TESTIMONIALS: [Testimonial; 4] = [
    Testimonial {
        name: "Sarah Johnson",
        position: "CEO, TechStart Inc.",
        text: "TaxingSolutions transformed our entire business strategy.",
    },
    Testimonial {
        name: "Michael Chen",
        position: "Founder, GrowthLab",
        text: "Their strategic insights helped us scale from a startup to a market leader.",
    },
    Testimonial {
        name: "Emily Rodriguez",
        position: "COO, Innovation Corp",
        text: "They don't just provide solutions; they become true partners in your success.",
    },
    Testimonial {
        name: "David Kim",
        position: "VP Marketing, NextGen",
        text: "Their deep industry knowledge helped us navigate complex challenges.",
    },
];

pub const ENQUIRY_SERVICES: [Choice; 7] = [
    ("business-strategy", "Business Strategy"),
    ("team-management", "Team Management"),
    ("market-analysis", "Market Analysis"),
    ("growth-solutions", "Growth Solutions"),
    ("financial-consulting", "Financial Consulting"),
    ("digital-transformation", "Digital Transformation"),
    ("custom-solution", "Custom Solution"),
];

pub const ENQUIRY_BUDGETS: [Choice; 5] = [
    ("under-5k", "Under $5,000"),
    ("5k-15k", "$5,000 - $15,000"),
    ("15k-50k", "$15,000 - $50,000"),
    ("50k-100k", "$50,000 - $100,000"),
    ("over-100k", "Over $100,000"),
];

pub const ENQUIRY_TIMELINES: [Choice; 5] = [
    ("asap", "ASAP"),
    ("1-3-months", "1-3 months"),
    ("3-6-months", "3-6 months"),
    ("6-12-months", "6-12 months"),
    ("flexible", "Flexible"),
];

pub const ENQUIRY_SOURCES: [Choice; 4] = [
    ("google", "Google Search"),
    ("social-media", "Social Media"),
    ("referral", "Referral"),
    ("event", "Event/Conference"),
];
