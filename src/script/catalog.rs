//! Built-in scripts, one per service-line subdomain

use crate::models::{QuickAction, Site, Topic};

use super::{ScriptError, ScriptTable};

/// Built-in script for a site.
pub fn for_site(site: Site) -> Result<ScriptTable, ScriptError> {
    match site {
        Site::AboutFace => about_face(),
        Site::Tmj => tmj(),
        Site::Implants => implants(),
        Site::Robotic => robotic(),
        Site::MedSpa => medspa(),
    }
}

fn opt(target: &str, label: &str) -> QuickAction {
    QuickAction::to(target, label)
}

fn about_face() -> Result<ScriptTable, ScriptError> {
    let consult = || QuickAction::new("consultation", "Book Consultation", "book-consultation");

    ScriptTable::new(
        "aboutface",
        "welcome",
        "Thank you for your message! For personalized information about EMFACE \
         treatments, I'd recommend booking a consultation where our experts can \
         provide detailed answers specific to your needs.",
        vec![
            Topic::new(
                "welcome",
                "Welcome to AboutFace Aesthetics! I'm here to help you discover the \
                 revolutionary EMFACE technology for non-invasive facial rejuvenation. \
                 How can I assist you today?",
                vec![
                    opt("emface-info", "What is EMFACE?"),
                    opt("treatment-options", "Treatment Options"),
                    opt("book-consultation", "Book Consultation"),
                    opt("pricing", "Pricing Information"),
                ],
            ),
            Topic::new(
                "emface-info",
                "EMFACE is the world's first and only needle-free procedure that \
                 simultaneously treats facial skin and muscles!\n\n\
                 Key Benefits:\n\
                 - Lifts and tones facial muscles\n\
                 - Reduces wrinkles and fine lines\n\
                 - Improves skin texture and firmness\n\
                 - No downtime required\n\
                 - FDA-cleared technology\n\n\
                 EMFACE uses synchronized RF (radiofrequency) and HIFES (High-Intensity \
                 Facial Electromagnetic Stimulation) energies to remodel and smooth your \
                 skin while toning your facial muscles.",
                vec![
                    opt("how-it-works", "How does EMFACE work?"),
                    opt("results", "What results can I expect?"),
                ],
            ),
            Topic::new(
                "how-it-works",
                "EMFACE Technology Explained:\n\n\
                 Dual-Energy System:\n\
                 - RF Energy: heats tissue to stimulate collagen production\n\
                 - HIFES Energy: contracts facial muscles for toning\n\n\
                 Treatment Process:\n\
                 1. Comfortable positioning with specialized applicators\n\
                 2. 20-minute session targeting key facial areas\n\
                 3. Synchronized energy delivery for optimal results\n\
                 4. No needles, no surgery, no downtime",
                vec![consult()],
            ),
            Topic::new(
                "results",
                "EMFACE Results Timeline:\n\n\
                 Immediate (after 1st session):\n\
                 - Skin feels tighter and refreshed\n\
                 - Subtle lifting sensation\n\n\
                 2-3 Weeks:\n\
                 - Noticeable improvement in skin texture\n\
                 - Enhanced facial contours\n\
                 - Reduced fine lines\n\n\
                 4-6 Weeks (peak results):\n\
                 - 23% increase in muscle tone\n\
                 - 30% more collagen production\n\
                 - Significant wrinkle reduction\n\
                 - Enhanced facial definition",
                vec![consult()],
            ),
            Topic::new(
                "treatment-options",
                "AboutFace EMFACE Packages:\n\n\
                 Signature Series (most popular)\n\
                 - 4 treatments over 2 weeks\n\
                 - Comprehensive facial rejuvenation\n\
                 - Best value for optimal results\n\n\
                 Express Refresh\n\
                 - Single treatment session\n\
                 - Perfect for special events\n\n\
                 VIP Total Transformation\n\
                 - 6 treatments + maintenance plan\n\
                 - Priority booking and concierge service",
                vec![opt("pricing", "View Pricing"), consult()],
            ),
            Topic::new(
                "pricing",
                "AboutFace EMFACE Pricing:\n\n\
                 Signature Series\n\
                 - 4 treatments: $2,400\n\
                 - Save $400 vs individual sessions\n\n\
                 Express Refresh\n\
                 - Single session: $700\n\n\
                 VIP Total Transformation\n\
                 - 6 treatments + extras: $3,200\n\n\
                 Financing Available:\n\
                 - 0% APR for qualified candidates\n\
                 - Monthly payment plans starting at $99\n\
                 - CareCredit accepted",
                vec![consult(), opt("financing", "Financing Options")],
            ),
            Topic::new(
                "financing",
                "Flexible Payment Solutions:\n\n\
                 CareCredit Healthcare Financing\n\
                 - 0% APR for 6-24 months (qualified applicants)\n\
                 - Quick online approval process\n\
                 - No prepayment penalties\n\n\
                 In-House Payment Plans\n\
                 - Split payments over treatment period\n\
                 - No credit check required\n\n\
                 Monthly Options:\n\
                 - Signature Series: $200/month x 12 months\n\
                 - Express treatments: pay-per-session\n\
                 - VIP packages: custom payment schedules",
                vec![consult()],
            ),
            Topic::new(
                "book-consultation",
                "Free EMFACE Consultation:\n\n\
                 What's Included:\n\
                 - Comprehensive facial analysis\n\
                 - Personalized treatment plan\n\
                 - Technology demonstration\n\
                 - Pricing and financing discussion\n\n\
                 Available Times:\n\
                 - Monday-Friday: 9 AM - 6 PM\n\
                 - Saturday: 9 AM - 4 PM\n\
                 - Same-day appointments often available\n\n\
                 Call/Text: (555) 123-FACE. Online and virtual consultations available.",
                vec![opt("call-now", "Call Now"), opt("book-online", "Book Online")],
            ),
            Topic::new(
                "call-now",
                "Call AboutFace Aesthetics Now:\n\n\
                 Direct Line: (555) 123-FACE\n\
                 Text Us: same number for quick questions\n\n\
                 Office Hours:\n\
                 - Monday-Friday: 9 AM - 6 PM\n\
                 - Saturday: 9 AM - 4 PM\n\
                 - Sunday: Closed\n\n\
                 When you call, mention you're interested in EMFACE and ask about new \
                 patient specials.",
                vec![],
            ),
            Topic::new(
                "book-online",
                "Online Booking Made Easy:\n\n\
                 - Visit www.aboutfaceaesthetics.com/book\n\
                 - Available 24/7 with real-time availability\n\
                 - Instant confirmation and text/email reminders\n\n\
                 Online Exclusive: 5% additional discount for online bookings.",
                vec![],
            ),
        ],
    )
}

fn tmj() -> Result<ScriptTable, ScriptError> {
    ScriptTable::new(
        "tmj",
        "welcome",
        "Thanks for reaching out! Jaw pain is different for everyone, so the best \
         next step is a TMJ evaluation with Dr. Pedro. Pick a topic below or book a visit.",
        vec![
            Topic::new(
                "welcome",
                "Hi! I'm the TMJ assistant. I can tell you about jaw pain, headaches and \
                 sleep-related symptoms we treat, and help you book an evaluation.",
                vec![
                    opt("symptoms", "Common TMJ Symptoms"),
                    opt("treatments", "Treatment Options"),
                    opt("evaluation", "Book an Evaluation"),
                ],
            ),
            Topic::new(
                "symptoms",
                "Common signs of a TMJ disorder:\n\
                 - Clicking or popping when you open your mouth\n\
                 - Jaw pain or tightness, especially in the morning\n\
                 - Frequent headaches or ear pain\n\
                 - Teeth grinding or clenching\n\
                 - Limited jaw opening",
                vec![
                    opt("treatments", "How is it treated?"),
                    opt("evaluation", "Book an Evaluation"),
                ],
            ),
            Topic::new(
                "treatments",
                "Our conservative TMJ care includes:\n\
                 - Custom oral appliances (night guards and splints)\n\
                 - Bite analysis and adjustment\n\
                 - Trigger point and muscle therapy\n\
                 - Sleep apnea screening when symptoms overlap",
                vec![
                    opt("insurance", "Is it covered by insurance?"),
                    opt("evaluation", "Book an Evaluation"),
                ],
            ),
            Topic::new(
                "insurance",
                "Many TMJ treatments are partly covered by medical insurance. Our team \
                 verifies your benefits before treatment starts and explains any \
                 out-of-pocket costs up front.",
                vec![opt("evaluation", "Book an Evaluation")],
            ),
            Topic::new(
                "evaluation",
                "A TMJ evaluation includes a jaw joint exam, bite assessment and imaging \
                 when needed. Call (555) 123-4TMJ or book online, and we'll find a time \
                 that works for you.",
                vec![],
            ),
        ],
    )
}

fn implants() -> Result<ScriptTable, ScriptError> {
    ScriptTable::new(
        "implants",
        "welcome",
        "Thanks for your question! Every smile is different, so our implant \
         coordinator can give you specifics at a free consultation.",
        vec![
            Topic::new(
                "welcome",
                "Welcome! I can walk you through dental implants, from a single tooth to \
                 full-arch restorations. What would you like to know?",
                vec![
                    opt("implant-types", "Implant Options"),
                    opt("process", "The Implant Process"),
                    opt("cost", "Cost & Financing"),
                    opt("consultation", "Free Consultation"),
                ],
            ),
            Topic::new(
                "implant-types",
                "Implant options we offer:\n\
                 - Single tooth implants\n\
                 - Implant-supported bridges\n\
                 - Full-arch (All-on-4 style) restorations\n\
                 - Implant-retained dentures",
                vec![
                    opt("process", "How does it work?"),
                    opt("cost", "Cost & Financing"),
                ],
            ),
            Topic::new(
                "process",
                "The implant process:\n\
                 1. Consultation with 3D imaging\n\
                 2. Implant placement\n\
                 3. Healing and integration (typically 3-6 months)\n\
                 4. Final crown, bridge or denture",
                vec![opt("consultation", "Free Consultation")],
            ),
            Topic::new(
                "cost",
                "Implant cost depends on the number of teeth and any bone grafting \
                 needed. We offer in-house payment plans and CareCredit financing, and \
                 review all costs with you before treatment.",
                vec![opt("consultation", "Free Consultation")],
            ),
            Topic::new(
                "consultation",
                "Your free implant consultation includes a 3D scan, a personalized \
                 treatment plan and a full cost breakdown. Call (555) 123-4567 to book.",
                vec![],
            ),
        ],
    )
}

fn robotic() -> Result<ScriptTable, ScriptError> {
    ScriptTable::new(
        "robotic",
        "welcome",
        "Great question! Our surgical team can answer that in detail at a \
         consultation. In the meantime, here's what I can help with.",
        vec![
            Topic::new(
                "welcome",
                "Hi! I can explain robot-assisted implant surgery with Yomi and how it \
                 compares to traditional placement.",
                vec![
                    opt("what-is-yomi", "What is Yomi?"),
                    opt("vs-traditional", "Robotic vs Traditional"),
                    opt("consultation", "Book Consultation"),
                ],
            ),
            Topic::new(
                "what-is-yomi",
                "Yomi is an FDA-cleared robotic system that guides the surgeon's hand \
                 during implant placement, following a plan built from your 3D scan.",
                vec![
                    opt("vs-traditional", "How is it different?"),
                    opt("recovery", "What is recovery like?"),
                ],
            ),
            Topic::new(
                "vs-traditional",
                "Robotic vs traditional placement:\n\
                 - Precision: guided to the planned angle and depth\n\
                 - Less invasive: often smaller incisions\n\
                 - Comfort: shorter procedures for many patients\n\
                 - Same-day teeth possible in suitable cases",
                vec![
                    opt("recovery", "What is recovery like?"),
                    opt("consultation", "Book Consultation"),
                ],
            ),
            Topic::new(
                "recovery",
                "Most patients return to normal activities within a day or two. Minimally \
                 invasive placement typically means less swelling and discomfort.",
                vec![opt("consultation", "Book Consultation")],
            ),
            Topic::new(
                "consultation",
                "Book a robotic implant consultation at (555) 123-4567. We'll review your \
                 scan and walk you through the surgical plan.",
                vec![],
            ),
        ],
    )
}

fn medspa() -> Result<ScriptTable, ScriptError> {
    ScriptTable::new(
        "medspa",
        "welcome",
        "Thank you for your message! Our concierge team will be happy to tailor a \
         plan for you. Here are a few places to start.",
        vec![
            Topic::new(
                "welcome",
                "Welcome to the MedSpa! Ask me about our aesthetic treatments, memberships \
                 or booking a visit.",
                vec![
                    opt("services", "Our Services"),
                    opt("membership", "Membership Benefits"),
                    opt("book", "Book a Visit"),
                ],
            ),
            Topic::new(
                "services",
                "MedSpa services include:\n\
                 - Neuromodulators and dermal fillers\n\
                 - Chemical peels and microneedling\n\
                 - EMFACE facial toning\n\
                 - Medical-grade skincare",
                vec![
                    opt("membership", "Membership Benefits"),
                    opt("book", "Book a Visit"),
                ],
            ),
            Topic::new(
                "membership",
                "Members receive monthly treatment credits, priority booking and member \
                 pricing on skincare products.",
                vec![opt("book", "Book a Visit")],
            ),
            Topic::new(
                "book",
                "Call (555) 123-4567 or book online to schedule your MedSpa visit.",
                vec![],
            ),
        ],
    )
}
